use crate::{
    handler::Reaction,
    outcome::Outcome,
    payload::Payload,
    stack,
    tag::{Kind, TagFilter},
};
use log::{debug, trace, warn};

/// Invokes `callback` against resolved state of `outcome` when `filter`
/// accepts its resolved tag, marking the outcome as dispatched.
///
/// A tag match alone marks the outcome as dispatched. Callbacks whose
/// parameter cannot be extracted from the payload are skipped.
pub fn apply<Q, C>(outcome: &mut Outcome, filter: &TagFilter, callback: C)
where
    C: Reaction<Q>,
{
    let tag = outcome.tag().clone();
    if !filter.accepts(&tag) {
        trace!("dispatch::apply - {:?} skipped by {:?}", tag, filter);
        return;
    }

    outcome.dispatched = true;
    let payload = Payload::Value(outcome.unwrap().clone());
    let success = stack::last(outcome).is_success();

    match callback.react(payload, tag.clone(), success) {
        Ok(()) => debug!("dispatch::apply - fired on {:?}", tag),
        Err(e) => warn!("dispatch::apply - callback skipped: {:#}", e),
    }
}

impl Outcome {
    /// Runs `callback` if the outcome succeeded and its resolved tag passes `filter`.
    ///
    /// ```rust
    /// use railway_core::{success_with, TagFilter};
    ///
    /// let mut fired = vec![];
    /// success_with(1, "valid")
    ///     .on_success("valid", |x: i64| fired.push(x))
    ///     .on_success("user_found", |x: i64| fired.push(x * 100))
    ///     .on_success(TagFilter::Any, |x: i64| fired.push(x * 10));
    ///
    /// assert_eq!(fired, vec![1, 10]);
    /// ```
    pub fn on_success<Q, F, C>(&mut self, filter: F, callback: C) -> &mut Self
    where
        F: Into<TagFilter>,
        C: Reaction<Q>,
    {
        if self.is_failure() {
            return self;
        }

        apply(self, &filter.into(), callback);
        self
    }

    /// Runs `callback` if the outcome failed and its resolved tag passes `filter`.
    pub fn on_failure<Q, F, C>(&mut self, filter: F, callback: C) -> &mut Self
    where
        F: Into<TagFilter>,
        C: Reaction<Q>,
    {
        if self.is_success() {
            return self;
        }

        apply(self, &filter.into(), callback);
        self
    }

    /// Runs `callback` regardless of success or tag.
    pub fn on_unknown<Q, C>(&mut self, callback: C) -> &mut Self
    where
        C: Reaction<Q>,
    {
        apply(self, &TagFilter::Any, callback);
        self
    }

    /// Routes to [`Outcome::on_success`], [`Outcome::on_failure`] or
    /// [`Outcome::on_unknown`] by `kind`. The filter is ignored for
    /// `Kind::Unknown`.
    pub fn on<Q, F, C>(&mut self, kind: Kind, filter: F, callback: C) -> &mut Self
    where
        F: Into<TagFilter>,
        C: Reaction<Q>,
    {
        match kind {
            Kind::Success => self.on_success(filter, callback),
            Kind::Failure => self.on_failure(filter, callback),
            Kind::Unknown => self.on_unknown(callback),
        }
    }

    /// Alias of [`Outcome::on`].
    pub fn pipe<Q, F, C>(&mut self, kind: Kind, filter: F, callback: C) -> &mut Self
    where
        F: Into<TagFilter>,
        C: Reaction<Q>,
    {
        self.on(kind, filter, callback)
    }

    /// Runs `callback` only if no earlier dispatch on this outcome fired.
    ///
    /// ```rust
    /// use railway_core::failure_with;
    /// use serde_json::Value;
    ///
    /// let mut fired = vec![];
    /// failure_with("as invalid", "invalid")
    ///     .on_failure("rescue", |_: Value| fired.push("rescue"))
    ///     .on_failure("not_found", |_: Value| fired.push("not_found"))
    ///     .otherwise(|x: Value| fired.push(if x == "as invalid" { "otherwise" } else { "?" }));
    ///
    /// assert_eq!(fired, vec!["otherwise"]);
    /// ```
    pub fn otherwise<Q, C>(&mut self, callback: C) -> &mut Self
    where
        C: Reaction<Q>,
    {
        if self.dispatched {
            return self;
        }

        apply(self, &TagFilter::Any, callback);
        self
    }
}
