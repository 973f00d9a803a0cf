use crate::{error::EmptyValue, payload::Payload, stack, tag::Tag};
use log::debug;
use serde_json::Value;
use std::{
    cell::OnceCell,
    fmt::{Debug, Display},
};

static NULL: Value = Value::Null;

/// Tagged success/failure value.
///
/// Outcomes consist of the following elements:
///
/// * A flag telling whether the outcome is on the success or on the failure track.
/// * A tag, subtype of the outcome within its track (`ok`, `error`, `persisted`, ...).
/// * A payload, either a plain value or another, boxed outcome.
/// * A marker set once any dispatch callback fired against the outcome.
///
/// Consumers observe the state of the terminal leaf of a boxed chain, see
/// [`crate::stack`]. Chain steps mutate the outcome in place so the same
/// instance can be reused after every step.
#[derive(Clone)]
pub struct Outcome {
    pub(crate) success: bool,
    pub(crate) tag: Tag,
    pub(crate) payload: Payload,
    pub(crate) dispatched: bool,

    /// Tag of the terminal leaf, computed on first access and reset by
    /// every mutation.
    resolved: OnceCell<Tag>,
}

impl Outcome {
    fn new(success: bool, tag: Tag, payload: Payload) -> Self {
        let mut outcome = Self {
            success,
            tag,
            payload,
            dispatched: false,
            resolved: OnceCell::new(),
        };
        outcome.settle();
        outcome
    }

    /// Creates successful outcome tagged with `ok`.
    pub fn success<P: Into<Payload>>(payload: P) -> Self {
        Self::new(true, Tag::OK, payload.into())
    }

    /// Creates failed outcome tagged with `error`.
    pub fn failure<P: Into<Payload>>(payload: P) -> Self {
        Self::new(false, Tag::ERROR, payload.into())
    }

    /// Replaces tag of the outcome.
    ///
    /// ```rust
    /// use railway_core::Outcome;
    ///
    /// let outcome = Outcome::success("save record!").tagged("persisted");
    /// assert_eq!(outcome.tag(), "persisted");
    /// ```
    pub fn tagged<T: Into<Tag>>(mut self, tag: T) -> Self {
        self.tag = tag.into();
        self.resolved = OnceCell::new();
        self
    }

    /// Keeps own flag in sync with the terminal leaf.
    fn settle(&mut self) {
        self.success = stack::last(self).success;
        self.resolved = OnceCell::new();
    }

    /// Overwrites state of the outcome. Used by chain steps and checks,
    /// the dispatched marker is left untouched.
    pub(crate) fn replace(&mut self, success: bool, tag: Tag, payload: Payload) {
        self.success = success;
        self.tag = tag;
        self.payload = payload;
        self.settle();
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// Tag of the terminal leaf.
    pub fn tag(&self) -> &Tag {
        self.resolved.get_or_init(|| stack::last(self).tag.clone())
    }

    /// Payload of the terminal leaf.
    pub fn unwrap(&self) -> &Value {
        stack::last(self).payload.as_value().unwrap_or(&NULL)
    }

    /// Own payload, possibly a boxed outcome.
    pub fn value(&self) -> &Payload {
        &self.payload
    }

    /// Own payload if the outcome failed.
    pub fn error(&self) -> Option<&Payload> {
        if self.is_failure() {
            Some(&self.payload)
        } else {
            None
        }
    }

    /// Payload of the terminal leaf, fails with [`EmptyValue`] when it is absent.
    ///
    /// Only `null` counts as absent, falsy values like `0`, `false` or `""`
    /// are present.
    pub fn value_required(&self) -> anyhow::Result<&Value> {
        match self.unwrap() {
            Value::Null => Err(EmptyValue.into()),
            value => Ok(value),
        }
    }

    /// Indicates if any dispatch callback fired against this outcome.
    pub fn is_dispatched(&self) -> bool {
        self.dispatched
    }

    /// Keeps the outcome if `predicate` holds for its own payload, otherwise
    /// turns it into an empty failure tagged with `error`.
    ///
    /// ```rust
    /// use railway_core::success;
    /// use serde_json::json;
    ///
    /// let mut outcome = success(json!({"a": 1}));
    /// outcome.check(|payload| payload.get("a") == Some(&json!(2)));
    ///
    /// assert!(outcome.is_failure());
    /// assert_eq!(outcome.tag(), "error");
    /// assert!(outcome.value().is_empty());
    /// ```
    pub fn check<P>(&mut self, predicate: P) -> &mut Self
    where
        P: FnOnce(&Payload) -> bool,
    {
        self.check_tagged(Tag::ERROR, predicate)
    }

    /// Same as [`Outcome::check`] but with caller supplied failure tag.
    pub fn check_tagged<T, P>(&mut self, tag: T, predicate: P) -> &mut Self
    where
        T: Into<Tag>,
        P: FnOnce(&Payload) -> bool,
    {
        if predicate(&self.payload) {
            return self;
        }

        let tag = tag.into();
        debug!("Outcome::check - predicate failed, tagging with {:?}", tag);
        self.replace(false, tag, Payload::empty());
        self
    }

    /// Resolved tag and payload, in that order.
    pub fn deconstruct(&self) -> (Tag, Value) {
        (self.tag().clone(), self.unwrap().clone())
    }

    /// Resolved tag and payload together with the raw error.
    pub fn deconstruct_keys(&self) -> Parts {
        Parts {
            tag: self.tag().clone(),
            value: self.unwrap().clone(),
            error: self.error().cloned(),
        }
    }

    /// Diagnostic view exposing resolved success, tag and payload.
    pub fn describe(&self) -> String {
        format!(
            "#<Outcome success={} tag={:?} payload={}>",
            stack::last(self).success,
            self.tag(),
            self.unwrap()
        )
    }
}

/// Named parts of an outcome, see [`Outcome::deconstruct_keys`].
#[derive(Debug, Clone, PartialEq)]
pub struct Parts {
    pub tag: Tag,
    pub value: Value,
    pub error: Option<Payload>,
}

impl PartialEq for Outcome {
    fn eq(&self, other: &Self) -> bool {
        self.success == other.success && self.tag == other.tag && self.payload == other.payload
    }
}

impl Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Prints resolved payload.
impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.unwrap() {
            Value::String(s) => f.write_str(s),
            value => write!(f, "{}", value),
        }
    }
}

/// Creates successful outcome tagged with `ok`.
pub fn success<P: Into<Payload>>(payload: P) -> Outcome {
    Outcome::success(payload)
}

/// Creates failed outcome tagged with `error`.
pub fn failure<P: Into<Payload>>(payload: P) -> Outcome {
    Outcome::failure(payload)
}

/// Creates successful outcome with given tag.
pub fn success_with<P: Into<Payload>, T: Into<Tag>>(payload: P, tag: T) -> Outcome {
    Outcome::success(payload).tagged(tag)
}

/// Creates failed outcome with given tag.
pub fn failure_with<P: Into<Payload>, T: Into<Tag>>(payload: P, tag: T) -> Outcome {
    Outcome::failure(payload).tagged(tag)
}
