use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields, GenericParam, Generics};

/// Derives `railway_core::FromPayload`.
///
/// * Newtype structs extract their single field from the whole payload.
/// * Structs with named fields take each field from the entry of a mapping
///   payload with the same name (keyed parameters). Missing entries are
///   extracted from `null`.
#[proc_macro_derive(FromPayload)]
pub fn derive_from_payload(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    // Parse the input tokens into a syntax tree
    let input = parse_macro_input!(input as DeriveInput);

    // Used in the quasi-quotation below as `#name`.
    let name = input.ident;

    // Add a bound `T: FromPayload` to every type parameter T.
    let generics = add_trait_bounds(input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match extract_fields(&input.data) {
        Ok(body) => body,
        Err(e) => return e.to_compile_error().into(),
    };

    let expanded = quote! {
        impl #impl_generics railway_core::FromPayload for #name #ty_generics #where_clause {
            fn from_payload(payload: railway_core::Payload) -> anyhow::Result<Self> {
                #body
            }
        }
    };

    // Hand the output tokens back to the compiler.
    proc_macro::TokenStream::from(expanded)
}

// Add a bound `T: FromPayload` to every type parameter T.
fn add_trait_bounds(mut generics: Generics) -> Generics {
    for param in &mut generics.params {
        if let GenericParam::Type(ref mut type_param) = *param {
            type_param
                .bounds
                .push(parse_quote!(railway_core::FromPayload));
        }
    }
    generics
}

fn extract_fields(data: &Data) -> syn::Result<TokenStream> {
    let data = match data {
        Data::Struct(data) => data,
        Data::Enum(e) => {
            return Err(syn::Error::new(
                e.enum_token.span(),
                "FromPayload can only be derived for structs",
            ))
        }
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span(),
                "FromPayload can only be derived for structs",
            ))
        }
    };

    match data.fields {
        // Expands to:
        //
        // Ok(Self(<Ty as FromPayload>::from_payload(payload)?))
        Fields::Unnamed(ref fields) => {
            if fields.unnamed.len() != 1 {
                return Err(syn::Error::new(
                    fields.span(),
                    "only single tuple value allowed",
                ));
            }

            let field = &fields.unnamed[0];
            let ty = &field.ty;

            Ok(quote_spanned!(field.span() =>
                Ok(Self(<#ty as railway_core::FromPayload>::from_payload(payload)?))
            ))
        }
        // Expands to:
        //
        // let mut fields = keyed_fields(payload)?;
        // Ok(Self { a: keyed_field(&mut fields, "a")?, ... })
        Fields::Named(ref fields) => {
            let assignments = fields
                .named
                .iter()
                .filter_map(|field| field.ident.as_ref().map(|ident| (ident, field)))
                .map(|(ident, field)| {
                    let ty = &field.ty;
                    let key = ident.to_string();

                    quote_spanned!(field.span() =>
                        #ident: railway_core::keyed_field::<#ty>(&mut fields, #key)?
                    )
                });

            Ok(quote! {
                let mut fields = railway_core::keyed_fields(payload)?;
                Ok(Self { #(#assignments,)* })
            })
        }
        Fields::Unit => Err(syn::Error::new(
            data.struct_token.span(),
            "unit structs carry nothing to extract",
        )),
    }
}
