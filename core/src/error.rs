use std::fmt::Display;

/// Raised by `Outcome::value_required` when the resolved payload is absent.
///
/// Signals a bug in host code that demanded a value without checking the
/// outcome first, it is never produced for domain failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyValue;

impl Display for EmptyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("value is empty")
    }
}

impl std::error::Error for EmptyValue {}
