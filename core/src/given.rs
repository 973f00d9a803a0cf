//! Error-catching companions of the chain.
//!
//! [`Given`] runs fallible side effects against an input and turns the first
//! error into a failure instead of propagating it. [`attempt`] wraps a single
//! fallible computation into an outcome.
use crate::{
    outcome::{failure, success, Outcome},
    payload::Payload,
    tag::{Kind, Tag},
};
use log::debug;
use serde_json::Value;

/// Input threaded through fallible steps. Once a step fails, the input is
/// replaced by the error message and later steps are skipped.
///
/// ```rust
/// use railway_core::given;
/// use serde_json::json;
///
/// let mut attributes = given(json!({"first_name": "THADEU", "last_name": "JUNIOR"}));
/// attributes
///     .and_then(|attrs| {
///         let lowered = attrs["first_name"].as_str().unwrap_or_default().to_lowercase();
///         attrs["first_name"] = json!(lowered);
///         Ok(())
///     })
///     .and_then(|_| anyhow::bail!("be error"));
///
/// assert!(attributes.is_failure());
/// assert_eq!(attributes.unwrap(), &json!("be error"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Given {
    input: Value,
    success: bool,
    tag: Option<Tag>,
}

impl Given {
    pub fn new<V: Into<Value>>(input: V) -> Self {
        Self {
            input: input.into(),
            success: true,
            tag: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// Tag set by a failed step, `None` until then.
    pub fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    pub fn unwrap(&self) -> &Value {
        &self.input
    }

    /// Input unless tagged with `ok`.
    pub fn error(&self) -> Option<&Value> {
        match &self.tag {
            Some(tag) if *tag == Tag::OK => None,
            _ => Some(&self.input),
        }
    }

    /// Runs `f` against the input, which it may modify in place. An error
    /// turns the wrapper into a failure tagged with `error` holding the
    /// error's message.
    pub fn and_then<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Value) -> anyhow::Result<()>,
    {
        if self.is_failure() {
            return self;
        }

        if let Err(e) = f(&mut self.input) {
            debug!("Given::and_then - step failed: {}", e);
            self.success = false;
            self.input = Value::from(e.to_string());
            self.tag = Some(Tag::ERROR);
        }
        self
    }

    /// Builds new wrapper from the value returned by `f`.
    pub fn and_then_replace<F, V>(&self, f: F) -> Self
    where
        F: FnOnce(&Value) -> V,
        V: Into<Value>,
    {
        Self::new(f(&self.input))
    }

    /// Same as [`Given::and_then`] but only while successful.
    pub fn on_success<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Value) -> anyhow::Result<()>,
    {
        if self.is_failure() {
            return self;
        }
        self.and_then(f)
    }

    /// Runs `f` against the error message once failed. Errors returned by
    /// `f` replace the message.
    pub fn on_failure<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Value) -> anyhow::Result<()>,
    {
        if self.is_success() {
            return self;
        }

        if let Err(e) = f(&mut self.input) {
            self.input = Value::from(e.to_string());
        }
        self
    }

    /// Routes to [`Given::on_success`] or [`Given::on_failure`]. Unknown kind
    /// runs nothing.
    pub fn on<F>(&mut self, kind: Kind, f: F) -> &mut Self
    where
        F: FnOnce(&mut Value) -> anyhow::Result<()>,
    {
        match kind {
            Kind::Success => self.on_success(f),
            Kind::Failure => self.on_failure(f),
            Kind::Unknown => self,
        }
    }

    /// Converts into an outcome so chain stepping can resume.
    pub fn into_outcome(self) -> Outcome {
        let tag = self.tag.unwrap_or(if self.success { Tag::OK } else { Tag::ERROR });
        let outcome = if self.success {
            success(self.input)
        } else {
            failure(self.input)
        };
        outcome.tagged(tag)
    }
}

impl From<Given> for Outcome {
    fn from(given: Given) -> Self {
        given.into_outcome()
    }
}

/// Creates new [`Given`].
pub fn given<V: Into<Value>>(input: V) -> Given {
    Given::new(input)
}

/// Runs `f`, wrapping its value into a success. An error is replaced by a
/// failure holding `default` and tagged with `error`.
///
/// ```rust
/// use railway_core::attempt;
///
/// let parsed = attempt((), || Ok("42".parse::<i64>()?));
/// assert_eq!(parsed.unwrap(), &serde_json::json!(42));
///
/// let invalid = attempt("not a number", || Ok("x".parse::<i64>()?));
/// assert!(invalid.is_failure());
/// assert_eq!(invalid.unwrap(), &serde_json::json!("not a number"));
/// ```
pub fn attempt<D, F, T>(default: D, f: F) -> Outcome
where
    D: Into<Payload>,
    F: FnOnce() -> anyhow::Result<T>,
    T: Into<Payload>,
{
    match f() {
        Ok(value) => success(value),
        Err(e) => {
            debug!("attempt - falling back to default: {}", e);
            failure(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn downcase(attrs: &mut Value, key: &str) -> anyhow::Result<()> {
        let lowered = attrs[key].as_str().unwrap_or_default().to_lowercase();
        attrs[key] = json!(lowered);
        Ok(())
    }

    #[test]
    fn test_and_then_mutates_input() {
        let mut attributes = given(json!({"first_name": "THADEU", "last_name": "JUNIOR"}));

        attributes
            .and_then(|attrs| downcase(attrs, "first_name"))
            .and_then(|attrs| downcase(attrs, "last_name"));

        assert!(attributes.is_success());
        assert_eq!(attributes.unwrap(), &json!({"first_name": "thadeu", "last_name": "junior"}));
        assert_eq!(
            attributes.error(),
            Some(&json!({"first_name": "thadeu", "last_name": "junior"}))
        );
    }

    #[test]
    fn test_and_then_replace_morphs_input() {
        let attributes = given(json!({"first_name": "thadeu", "last_name": "junior"}));

        let sliced =
            attributes.and_then_replace(|attrs| json!({"first_name": attrs["first_name"]}));

        assert_eq!(sliced.unwrap(), &json!({"first_name": "thadeu"}));
    }

    #[test]
    fn test_error_stops_later_steps() {
        let mut calls = 0;
        let mut mailer = given(json!({"first_name": "thadeu"}));

        mailer
            .and_then(|_| anyhow::bail!("be error"))
            .and_then(|_| {
                calls += 1;
                Ok(())
            });

        assert_eq!(calls, 0);
        assert!(mailer.is_failure());
        assert_eq!(mailer.tag(), Some(&Tag::ERROR));
        assert_eq!(mailer.unwrap(), &json!("be error"));
    }

    #[test]
    fn test_on_routes_by_state() {
        let mut seen = vec![];
        let mut state = given(1);

        state
            .on(Kind::Failure, |_| {
                seen.push("failure");
                Ok(())
            })
            .on(Kind::Success, |_| anyhow::bail!("boom"))
            .on(Kind::Failure, |error| {
                seen.push("failure after error");
                *error = json!(format!("handled {}", error.as_str().unwrap_or_default()));
                Ok(())
            });

        assert_eq!(seen, vec!["failure after error"]);
        assert_eq!(state.unwrap(), &json!("handled boom"));
    }

    #[test]
    fn test_into_outcome() {
        let outcome = given(json!({"a": 1})).into_outcome();
        assert!(outcome.is_success());
        assert_eq!(outcome.tag(), "ok");

        let mut failed = given(1);
        failed.and_then(|_| anyhow::bail!("be error"));
        let outcome: Outcome = failed.into();
        assert!(outcome.is_failure());
        assert_eq!(outcome.tag(), "error");
        assert_eq!(outcome.unwrap(), &json!("be error"));
    }

    #[test]
    fn test_attempt() {
        let ok = attempt((), || Ok(1));
        assert!(ok.is_success());

        let failed = attempt("fallback", || -> anyhow::Result<i64> { anyhow::bail!("nope") });
        assert!(failed.is_failure());
        assert_eq!(failed.tag(), "error");
        assert_eq!(failed.unwrap(), &json!("fallback"));
    }
}
