use crate::{
    outcome::{failure, Outcome},
    payload::Json,
};
use anyhow::Context;
use log::debug;
use serde::Serialize;
use serde_json::Value;

/// What a continuation produced: either a whole outcome, absorbed by the
/// stepped outcome, or a plain value replacing its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Stepped {
    Outcome(Outcome),
    Value(Value),
}

/// Implemented by types continuations are allowed to return.
pub trait IntoStepped {
    fn into_stepped(self) -> anyhow::Result<Stepped>;
}

impl IntoStepped for Stepped {
    fn into_stepped(self) -> anyhow::Result<Stepped> {
        Ok(self)
    }
}

impl IntoStepped for Outcome {
    fn into_stepped(self) -> anyhow::Result<Stepped> {
        Ok(Stepped::Outcome(self))
    }
}

impl IntoStepped for Value {
    fn into_stepped(self) -> anyhow::Result<Stepped> {
        Ok(Stepped::Value(self))
    }
}

/// Continuations run only for their side effects leave an empty payload.
impl IntoStepped for () {
    fn into_stepped(self) -> anyhow::Result<Stepped> {
        Ok(Stepped::Value(Value::Null))
    }
}

impl<'a> IntoStepped for &'a str {
    fn into_stepped(self) -> anyhow::Result<Stepped> {
        Ok(Stepped::Value(Value::from(self)))
    }
}

macro_rules! stepped_from {
    ($($type:ty),*) => {
        $(
            impl IntoStepped for $type {
                fn into_stepped(self) -> anyhow::Result<Stepped> {
                    Ok(Stepped::Value(Value::from(self)))
                }
            }
        )*
    };
}

stepped_from!(bool, i32, i64, u32, u64, usize, String);

/// NaN and infinities have no payload representation and are rejected.
impl IntoStepped for f64 {
    fn into_stepped(self) -> anyhow::Result<Stepped> {
        let number = serde_json::Number::from_f64(self)
            .with_context(|| format!("{} is not a representable payload number", self))?;
        Ok(Stepped::Value(Value::Number(number)))
    }
}

/// `None` becomes an empty payload.
impl<T> IntoStepped for Option<T>
where
    T: IntoStepped,
{
    fn into_stepped(self) -> anyhow::Result<Stepped> {
        match self {
            Some(inner) => inner.into_stepped(),
            None => Ok(Stepped::Value(Value::Null)),
        }
    }
}

/// Serializes wrapped value into the payload.
impl<T> IntoStepped for Json<T>
where
    T: Serialize,
{
    fn into_stepped(self) -> anyhow::Result<Stepped> {
        Ok(Stepped::Value(serde_json::to_value(self.0)?))
    }
}

/// Errors returned by a continuation become failures tagged with `error`
/// carrying the error's message.
///
/// ```rust
/// use railway_core::success;
///
/// let mut outcome = success(1);
/// outcome.step(|_: i64| -> anyhow::Result<i64> { anyhow::bail!("be error") });
///
/// assert!(outcome.is_failure());
/// assert_eq!(outcome.unwrap(), "be error");
/// ```
impl<T> IntoStepped for anyhow::Result<T>
where
    T: IntoStepped,
{
    fn into_stepped(self) -> anyhow::Result<Stepped> {
        match self {
            Ok(inner) => inner.into_stepped(),
            Err(e) => {
                debug!("IntoStepped - continuation returned error: {}", e);
                Ok(Stepped::Outcome(failure(e.to_string())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::success_with;
    use serde_json::json;

    #[derive(Serialize)]
    struct Price {
        price: f64,
    }

    #[test]
    fn test_plain_values() -> anyhow::Result<()> {
        assert_eq!(2_i64.into_stepped()?, Stepped::Value(json!(2)));
        assert_eq!("a".into_stepped()?, Stepped::Value(json!("a")));
        assert_eq!(().into_stepped()?, Stepped::Value(Value::Null));
        assert_eq!(None::<i64>.into_stepped()?, Stepped::Value(Value::Null));
        assert_eq!(
            Json(Price { price: 110.0 }).into_stepped()?,
            Stepped::Value(json!({"price": 110.0}))
        );
        Ok(())
    }

    #[test]
    fn test_non_finite_float_is_rejected() -> anyhow::Result<()> {
        assert_eq!(1.5_f64.into_stepped()?, Stepped::Value(json!(1.5)));
        assert!(f64::NAN.into_stepped().is_err());
        assert!(f64::INFINITY.into_stepped().is_err());
        Ok(())
    }

    #[test]
    fn test_outcome_is_kept_whole() -> anyhow::Result<()> {
        let outcome = success_with(2, "continue");
        assert_eq!(outcome.clone().into_stepped()?, Stepped::Outcome(outcome));
        Ok(())
    }

    #[test]
    fn test_error_becomes_failure() -> anyhow::Result<()> {
        let result: anyhow::Result<i64> = Err(anyhow::anyhow!("be error"));

        match result.into_stepped()? {
            Stepped::Outcome(outcome) => {
                assert!(outcome.is_failure());
                assert_eq!(outcome.tag(), "error");
                assert_eq!(outcome.unwrap(), &json!("be error"));
            }
            other => panic!("expected outcome, got {:?}", other),
        }
        Ok(())
    }
}
