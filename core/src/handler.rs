//! Calling conventions of user supplied closures.
//!
//! Closures passed to chain steps, dispatch callbacks and match branches can
//! declare zero, one or (for callbacks and branches) two parameters. The
//! marker type `Q` of every trait here is the tuple of declared parameters,
//! which lets various closure shapes implement the same trait and be
//! selected by their signature at the call site:
//!
//! * `|| ...` takes no arguments, the closure captures what it needs.
//! * `|value: T| ...` takes the payload extracted through [`FromPayload`]. Use
//!   [`crate::Keyed`] (or a type deriving `FromPayload` with named fields) to
//!   have entries of a mapping payload spread into named fields.
//! * `|value: T, extra| ...` additionally receives resolved state of the outcome.
use crate::{
    payload::{FromPayload, Payload},
    tag::Tag,
};

/// Continuation of a chain step.
pub trait Continuation<Q> {
    type Output;

    /// Extracts parameters from the payload and calls the continuation.
    /// Fails only when the payload cannot be extracted into declared parameter.
    fn call(self, payload: Payload) -> anyhow::Result<Self::Output>;
}

impl<F, R> Continuation<()> for F
where
    F: FnOnce() -> R,
{
    type Output = R;

    fn call(self, _payload: Payload) -> anyhow::Result<R> {
        Ok(self())
    }
}

impl<F, T, R> Continuation<(T,)> for F
where
    T: FromPayload,
    F: FnOnce(T) -> R,
{
    type Output = R;

    fn call(self, payload: Payload) -> anyhow::Result<R> {
        Ok(self(T::from_payload(payload)?))
    }
}

/// Side-effect callback run by tag dispatch. Besides the payload it may
/// receive the resolved `(tag, success)` pair.
pub trait Reaction<Q> {
    fn react(self, payload: Payload, tag: Tag, success: bool) -> anyhow::Result<()>;
}

impl<F> Reaction<()> for F
where
    F: FnOnce(),
{
    fn react(self, _payload: Payload, _tag: Tag, _success: bool) -> anyhow::Result<()> {
        self();
        Ok(())
    }
}

impl<F, T> Reaction<(T,)> for F
where
    T: FromPayload,
    F: FnOnce(T),
{
    fn react(self, payload: Payload, _tag: Tag, _success: bool) -> anyhow::Result<()> {
        self(T::from_payload(payload)?);
        Ok(())
    }
}

impl<F, T> Reaction<(T, (Tag, bool))> for F
where
    T: FromPayload,
    F: FnOnce(T, (Tag, bool)),
{
    fn react(self, payload: Payload, tag: Tag, success: bool) -> anyhow::Result<()> {
        self(T::from_payload(payload)?, (tag, success));
        Ok(())
    }
}

/// Branch of a two-way match, receives payload and the resolved tag
/// depending on its declared arity.
pub trait Branch<Q, R> {
    fn invoke(self, payload: Payload, tag: Tag) -> anyhow::Result<R>;
}

impl<F, R> Branch<(), R> for F
where
    F: FnOnce() -> R,
{
    fn invoke(self, _payload: Payload, _tag: Tag) -> anyhow::Result<R> {
        Ok(self())
    }
}

impl<F, T, R> Branch<(T,), R> for F
where
    T: FromPayload,
    F: FnOnce(T) -> R,
{
    fn invoke(self, payload: Payload, _tag: Tag) -> anyhow::Result<R> {
        Ok(self(T::from_payload(payload)?))
    }
}

impl<F, T, R> Branch<(T, Tag), R> for F
where
    T: FromPayload,
    F: FnOnce(T, Tag) -> R,
{
    fn invoke(self, payload: Payload, tag: Tag) -> anyhow::Result<R> {
        Ok(self(T::from_payload(payload)?, tag))
    }
}

/// Marker for branch shapes accepted on the failure side of a match, which
/// always receives the error.
pub trait FailureBranch<Q, R>: Branch<Q, R> {}

impl<F, T, R> FailureBranch<(T,), R> for F where F: Branch<(T,), R> {}

impl<F, T, R> FailureBranch<(T, Tag), R> for F where F: Branch<(T, Tag), R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Keyed;
    use serde::Deserialize;
    use serde_json::{json, Value};

    fn run<Q, C: Continuation<Q>>(continuation: C, payload: Payload) -> anyhow::Result<C::Output> {
        continuation.call(payload)
    }

    fn react<Q, C: Reaction<Q>>(callback: C, payload: Payload) -> anyhow::Result<()> {
        callback.react(payload, Tag::from("persisted"), true)
    }

    #[derive(Deserialize)]
    struct Above {
        above: i64,
    }

    #[test]
    fn test_continuation_shapes() -> anyhow::Result<()> {
        let captured = 41;
        assert_eq!(run(move || captured + 1, Payload::from(0))?, 42);
        assert_eq!(run(|x: i64| x * 2, Payload::from(21))?, 42);
        assert_eq!(
            run(
                |x: Value| x["a"].as_i64().unwrap_or_default() + 1,
                Payload::from(json!({"a": 1}))
            )?,
            2
        );
        assert_eq!(
            run(|Keyed(Above { above }): Keyed<Above>| above, Payload::from(json!({"above": 1})))?,
            1
        );
        Ok(())
    }

    #[test]
    fn test_continuation_extraction_error() {
        let err = run(|x: i64| x, Payload::from("not a number")).unwrap_err();
        assert!(err.to_string().contains("not a valid i64"));

        assert!(run(|Keyed(a): Keyed<Above>| a.above, Payload::from(1)).is_err());
    }

    #[test]
    fn test_reaction_shapes() -> anyhow::Result<()> {
        let mut seen = vec![];

        react(|| seen.push(json!("fired")), Payload::from(1))?;
        react(|x: Value| seen.push(x), Payload::from(2))?;
        react(
            |x: Value, (tag, success): (Tag, bool)| seen.push(json!([x, tag.as_str(), success])),
            Payload::from(3),
        )?;

        assert_eq!(seen, vec![json!("fired"), json!(2), json!([3, "persisted", true])]);
        Ok(())
    }

    #[test]
    fn test_branch_shapes() -> anyhow::Result<()> {
        let tag = Tag::from("valid");

        assert_eq!(Branch::invoke(|| 0, Payload::from(1), tag.clone())?, 0);
        assert_eq!(Branch::invoke(|x: i64| x, Payload::from(1), tag.clone())?, 1);
        assert_eq!(
            Branch::invoke(|x: i64, t: Tag| format!("{}:{}", x, t), Payload::from(1), tag)?,
            "1:valid"
        );
        Ok(())
    }
}
