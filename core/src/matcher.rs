use crate::{
    handler::{Branch, FailureBranch},
    outcome::Outcome,
    payload::Payload,
};

impl Outcome {
    /// Invokes exactly one of two branches and returns what it returned.
    ///
    /// On success `ok` receives, depending on its declared parameters,
    /// nothing, the resolved payload, or the resolved payload and tag. On
    /// failure `err` receives the raw error, optionally followed by the
    /// resolved tag. Fails only when the payload cannot be extracted into the
    /// parameter declared by the chosen branch.
    ///
    /// ```rust
    /// use railway_core::{failure_with, success, Tag};
    /// use serde_json::Value;
    ///
    /// let doubled = success(21).match_with(|x: i64| x * 2, |_: Value| 0)?;
    /// assert_eq!(doubled, 42);
    ///
    /// let described = failure_with("missing", "record_not_found").match_with(
    ///     || String::from("found"),
    ///     |error: String, tag: Tag| format!("{}: {}", tag, error),
    /// )?;
    /// assert_eq!(described, "record_not_found: missing");
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn match_with<QO, QE, O, E, R>(&self, ok: O, err: E) -> anyhow::Result<R>
    where
        O: Branch<QO, R>,
        E: FailureBranch<QE, R>,
    {
        let tag = self.tag().clone();

        match self.error() {
            Some(error) => err.invoke(error.clone(), tag),
            None => ok.invoke(Payload::Value(self.unwrap().clone()), tag),
        }
    }
}
