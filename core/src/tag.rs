use anyhow::bail;
use std::{
    borrow::Cow,
    fmt::{Debug, Display},
};

/// Subtype discriminator carried by every `Outcome`.
///
/// Tags are free-form identifiers (`ok`, `record_not_found`, `persisted`, ...)
/// compared by their textual value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(Cow<'static, str>);

impl Tag {
    /// Default tag of a success.
    pub const OK: Tag = Tag(Cow::Borrowed("ok"));

    /// Default tag of a failure.
    pub const ERROR: Tag = Tag(Cow::Borrowed("error"));

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self(Cow::Owned(value.to_owned()))
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<&Tag> for Tag {
    fn from(value: &Tag) -> Self {
        value.clone()
    }
}

impl PartialEq<str> for Tag {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ":{}", self)
    }
}

/// Tag selector used by dispatching operations. `Any` is the wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    Any,
    Only(Tag),
}

impl TagFilter {
    /// Indicates if the filter accepts given tag.
    pub fn accepts(&self, tag: &Tag) -> bool {
        match self {
            TagFilter::Any => true,
            TagFilter::Only(expected) => expected == tag,
        }
    }
}

impl From<Tag> for TagFilter {
    fn from(tag: Tag) -> Self {
        TagFilter::Only(tag)
    }
}

impl From<&str> for TagFilter {
    fn from(tag: &str) -> Self {
        TagFilter::Only(tag.into())
    }
}

impl From<Option<Tag>> for TagFilter {
    fn from(tag: Option<Tag>) -> Self {
        tag.map_or(TagFilter::Any, TagFilter::Only)
    }
}

/// Branch a dispatch call is routed to by `Outcome::on`.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Kind {
    Success,
    Failure,
    Unknown,
}

impl TryFrom<&str> for Kind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "unknown" => Ok(Self::Unknown),
            _ => bail!("invalid dispatch kind: {}", value),
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match *self {
            Kind::Success => "success",
            Kind::Failure => "failure",
            Kind::Unknown => "unknown",
        })
    }
}
