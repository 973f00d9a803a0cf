use crate::{
    handler::Continuation,
    outcome::Outcome,
    payload::Payload,
    stack,
    stepped::{IntoStepped, Stepped},
    tag::Tag,
};
use log::{debug, trace, warn};

/// State the terminal leaf had before the step.
struct Prior {
    success: bool,
    tag: Tag,
    payload: Payload,
}

impl Outcome {
    fn prior(&self) -> Prior {
        let leaf = stack::last(self);
        Prior {
            success: leaf.success,
            tag: leaf.tag.clone(),
            payload: leaf.payload.clone(),
        }
    }

    /// Collapses the whole chain into the failed leaf.
    fn short_circuit(&mut self, prior: Prior) -> &mut Self {
        trace!("Outcome::step - short-circuit on {:?}", prior.tag);
        self.replace(false, prior.tag, prior.payload);
        self
    }

    fn apply_stepped(&mut self, prior_tag: Tag, stepped: Stepped) -> &mut Self {
        match stepped {
            Stepped::Outcome(returned) => {
                debug!("Outcome::step - absorbing returned {:?}", returned);
                self.replace(returned.success, returned.tag, returned.payload);
            }
            Stepped::Value(value) => self.replace(true, prior_tag, Payload::Value(value)),
        }
        self
    }

    /// Advances the outcome by one computation stage.
    ///
    /// The continuation runs against the payload of the terminal leaf, only
    /// when that leaf succeeded. Otherwise the whole chain collapses into the
    /// failed leaf and the continuation is never called. A returned outcome
    /// is absorbed (its own success, tag and payload replace the ones of this
    /// outcome), a returned plain value replaces the payload keeping the tag.
    ///
    /// ```rust
    /// use railway_core::success;
    /// use serde_json::{json, Value};
    ///
    /// let mut outcome = success(json!({"a": 1}));
    /// outcome.step(|x: Value| x["a"].as_i64().unwrap_or_default() + 1);
    ///
    /// assert_eq!(outcome.unwrap(), &json!(2));
    /// assert_eq!(outcome.tag(), "ok");
    /// ```
    ///
    /// Parameters which cannot be extracted from the payload turn the outcome
    /// into a failure tagged with `error`, so do `Err`s returned by the
    /// continuation. Panics are not caught.
    pub fn step<Q, C>(&mut self, continuation: C) -> &mut Self
    where
        C: Continuation<Q>,
        C::Output: IntoStepped,
    {
        let prior = self.prior();
        if !prior.success {
            return self.short_circuit(prior);
        }

        match continuation
            .call(prior.payload)
            .and_then(IntoStepped::into_stepped)
        {
            Ok(stepped) => self.apply_stepped(prior.tag, stepped),
            Err(e) => {
                warn!("Outcome::step - continuation could not run: {:#}", e);
                self.replace(false, Tag::ERROR, Payload::from(e.to_string()));
                self
            }
        }
    }

    /// Alias of [`Outcome::step`].
    pub fn then<Q, C>(&mut self, continuation: C) -> &mut Self
    where
        C: Continuation<Q>,
        C::Output: IntoStepped,
    {
        self.step(continuation)
    }

    /// Alias of [`Outcome::step`].
    pub fn and_then<Q, C>(&mut self, continuation: C) -> &mut Self
    where
        C: Continuation<Q>,
        C::Output: IntoStepped,
    {
        self.step(continuation)
    }

    /// Alias of [`Outcome::step`].
    pub fn fmap<Q, C>(&mut self, continuation: C) -> &mut Self
    where
        C: Continuation<Q>,
        C::Output: IntoStepped,
    {
        self.step(continuation)
    }

    /// Same as [`Outcome::step`] for fallible continuations, except that
    /// errors are propagated to the caller instead of becoming failures.
    /// The outcome is left untouched when an error is returned.
    ///
    /// ```rust
    /// use railway_core::success;
    ///
    /// let mut outcome = success(1);
    /// let result = outcome.try_step(|_: i64| -> anyhow::Result<i64> { anyhow::bail!("boom") });
    ///
    /// assert!(result.is_err());
    /// assert!(outcome.is_success());
    /// ```
    pub fn try_step<Q, C, R>(&mut self, continuation: C) -> anyhow::Result<&mut Self>
    where
        C: Continuation<Q, Output = anyhow::Result<R>>,
        R: IntoStepped,
    {
        let prior = self.prior();
        if !prior.success {
            return Ok(self.short_circuit(prior));
        }

        let stepped = continuation.call(prior.payload)??.into_stepped()?;
        Ok(self.apply_stepped(prior.tag, stepped))
    }
}
