use crate::{outcome::Outcome, stack};
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Content carried by an `Outcome`. Either a plain value or another,
/// boxed outcome forming a chain of nested outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Value(Value),
    Boxed(Box<Outcome>),
}

impl Payload {
    /// Empty payload, `Value::Null` is treated as the absent value.
    pub const fn empty() -> Self {
        Payload::Value(Value::Null)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Value(Value::Null))
    }

    pub fn is_boxed(&self) -> bool {
        matches!(self, Payload::Boxed(_))
    }

    /// Returns plain value, `None` for boxed outcomes.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Payload::Value(value) => Some(value),
            Payload::Boxed(_) => None,
        }
    }

    /// Returns boxed outcome, `None` for plain values.
    pub fn as_outcome(&self) -> Option<&Outcome> {
        match self {
            Payload::Value(_) => None,
            Payload::Boxed(outcome) => Some(outcome),
        }
    }

    /// Looks up `key` in a mapping payload.
    ///
    /// ```rust
    /// use railway_core::Payload;
    /// use serde_json::json;
    ///
    /// let payload = Payload::from(json!({"price": 110}));
    /// assert_eq!(payload.get("price"), Some(&json!(110)));
    /// ```
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_value().and_then(|value| value.get(key))
    }

    /// Turns payload into plain value, descending into boxed outcomes
    /// until the terminal one is reached.
    pub fn into_value(self) -> Value {
        match self {
            Payload::Value(value) => value,
            Payload::Boxed(outcome) => stack::into_leaf(*outcome).value,
        }
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq<Value> for Payload {
    fn eq(&self, other: &Value) -> bool {
        self.as_value() == Some(other)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Value(value)
    }
}

impl From<Outcome> for Payload {
    fn from(outcome: Outcome) -> Self {
        Payload::Boxed(Box::new(outcome))
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::empty()
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Value(Value::from(value))
    }
}

impl<T> From<Option<T>> for Payload
where
    T: Into<Payload>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Payload::empty, Into::into)
    }
}

/// Implements `From<$type> for Payload` going through `serde_json::Value`.
macro_rules! payload_from {
    ($($type:ty),*) => {
        $(
            impl From<$type> for Payload {
                fn from(value: $type) -> Self {
                    Payload::Value(Value::from(value))
                }
            }
        )*
    };
}

payload_from!(bool, i32, i64, u32, u64, usize, String);

/// JSON has no representation for NaN and infinities, those become the
/// empty payload.
impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::Value(Value::from(value))
    }
}

/// Allows various types to be created from a payload. Parameters of
/// continuations, dispatch callbacks and match branches are extracted
/// through this trait.
pub trait FromPayload: Sized {
    fn from_payload(payload: Payload) -> anyhow::Result<Self>;
}

/// Raw payload, possibly boxed.
impl FromPayload for Payload {
    fn from_payload(payload: Payload) -> anyhow::Result<Self> {
        Ok(payload)
    }
}

/// Plain value, boxed payloads are resolved to their terminal value.
impl FromPayload for Value {
    fn from_payload(payload: Payload) -> anyhow::Result<Self> {
        Ok(payload.into_value())
    }
}

/// `None` for the empty payload.
impl<T> FromPayload for Option<T>
where
    T: FromPayload,
{
    fn from_payload(payload: Payload) -> anyhow::Result<Self> {
        if payload.is_empty() {
            return Ok(None);
        }
        T::from_payload(payload).map(Some)
    }
}

/// Macro for faster FromPayload implementations of primitive types.
macro_rules! extract_primitive {
    ($($type:ty),*) => {
        $(
            impl FromPayload for $type {
                fn from_payload(payload: Payload) -> anyhow::Result<Self> {
                    let value = payload.into_value();
                    serde_json::from_value(value.clone()).with_context(|| {
                        format!("payload {} is not a valid {}", value, stringify!($type))
                    })
                }
            }
        )*
    };
}

extract_primitive!(bool, i32, i64, u32, u64, usize, f64, String);

/// Placeholder for value that can be deserialized from the payload as a
/// single positional parameter.
///
/// ```rust
/// use railway_core::{success, Json};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Order {
///     price: f64,
/// }
///
/// let mut outcome = success(serde_json::json!({"price": 110.0}));
/// outcome.step(|Json(order): Json<Order>| order.price + 1.0);
/// assert_eq!(outcome.unwrap(), &serde_json::json!(111.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T> FromPayload for Json<T>
where
    T: DeserializeOwned,
{
    fn from_payload(payload: Payload) -> anyhow::Result<Self> {
        let value = serde_json::from_value(payload.into_value())?;
        Ok(Json(value))
    }
}

/// Keyed parameters: entries of a mapping payload are spread into the named
/// fields of `T`. Payloads that are not mappings are rejected.
///
/// ```rust
/// use railway_core::{success, Keyed};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Above {
///     above: i64,
/// }
///
/// let mut outcome = success(serde_json::json!({"above": 1}));
/// outcome.step(|Keyed(Above { above }): Keyed<Above>| above + 1);
/// assert_eq!(outcome.unwrap(), &serde_json::json!(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T>(pub T);

impl<T> FromPayload for Keyed<T>
where
    T: DeserializeOwned,
{
    fn from_payload(payload: Payload) -> anyhow::Result<Self> {
        let value = payload.into_value();
        if !value.is_object() {
            bail!("keyed parameters require a mapping payload, got {}", value);
        }

        let fields = serde_json::from_value(value).context("could not spread keyed parameters")?;
        Ok(Keyed(fields))
    }
}

/// Takes a named field out of a mapping payload. Used by code generated
/// with `#[derive(FromPayload)]` on structs with named fields.
pub fn keyed_field<T>(fields: &mut serde_json::Map<String, Value>, name: &str) -> anyhow::Result<T>
where
    T: FromPayload,
{
    let value = fields.remove(name).unwrap_or(Value::Null);
    T::from_payload(Payload::Value(value))
        .with_context(|| format!("invalid keyed field `{}`", name))
}

/// Turns payload into a mapping of named fields.
pub fn keyed_fields(payload: Payload) -> anyhow::Result<serde_json::Map<String, Value>> {
    match payload.into_value() {
        Value::Object(fields) => Ok(fields),
        other => bail!("keyed parameters require a mapping payload, got {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{failure, success};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        name: String,
        email: String,
    }

    #[test]
    fn test_get_on_mapping() {
        let payload = Payload::from(json!({"a": 1}));
        assert_eq!(payload.get("a"), Some(&json!(1)));
        assert_eq!(payload.get("b"), None);

        let boxed = Payload::from(success(json!({"a": 1})));
        assert!(boxed.is_boxed());
        assert_eq!(boxed.get("a"), None);
        assert_eq!(boxed.as_outcome().map(|o| o.unwrap()), Some(&json!({"a": 1})));
        assert!(payload.as_outcome().is_none());
    }

    #[test]
    fn test_into_value_descends_boxed() {
        let payload = Payload::from(failure(success(failure("deep"))));
        assert_eq!(payload.into_value(), json!("deep"));
    }

    #[test]
    fn test_primitive_extraction() -> anyhow::Result<()> {
        assert_eq!(i64::from_payload(Payload::from(5))?, 5);
        assert_eq!(String::from_payload(Payload::from("x"))?, "x");
        assert!(i64::from_payload(Payload::from("x")).is_err());
        assert_eq!(Option::<i64>::from_payload(Payload::empty())?, None);
        assert_eq!(Option::<i64>::from_payload(Payload::from(3))?, Some(3));
        Ok(())
    }

    #[test]
    fn test_keyed_extraction() -> anyhow::Result<()> {
        let payload = Payload::from(json!({"name": "thadeu", "email": "t@example.com"}));
        let Keyed(user) = Keyed::<User>::from_payload(payload)?;
        assert_eq!(
            user,
            User {
                name: "thadeu".into(),
                email: "t@example.com".into()
            }
        );

        let err = Keyed::<User>::from_payload(Payload::from(1)).unwrap_err();
        assert!(err.to_string().contains("mapping payload"));
        Ok(())
    }

    #[test]
    fn test_keyed_field_missing_is_null() -> anyhow::Result<()> {
        let mut fields = keyed_fields(Payload::from(json!({"above": 1})))?;
        let above: i64 = keyed_field(&mut fields, "above")?;
        let missing: Option<i64> = keyed_field(&mut fields, "below")?;
        assert_eq!(above, 1);
        assert_eq!(missing, None);
        Ok(())
    }
}
