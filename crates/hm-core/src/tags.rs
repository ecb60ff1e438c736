//! Tag sets: the labels every model node and marker carries.
//!
//! Tags are whitespace-free words kept in insertion order without
//! duplicates.  A tag query such as `"rod A"` matches anything carrying both
//! `rod` and `A`.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// An ordered, duplicate-free set of labels.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tags {
    labels: Vec<String>,
}

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single tag.  Adding a tag that is already present is a no-op.
    pub fn insert(&mut self, tag: &str) -> CoreResult<()> {
        if tag.is_empty() || tag.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidTag(tag.to_owned()));
        }
        if !self.contains(tag) {
            self.labels.push(tag.to_owned());
        }
        Ok(())
    }

    /// Append every tag of `other` not already present.
    pub fn extend(&mut self, other: &Tags) {
        for tag in &other.labels {
            if !self.contains(tag) {
                self.labels.push(tag.clone());
            }
        }
    }

    #[inline]
    pub fn contains(&self, tag: &str) -> bool {
        self.labels.iter().any(|t| t == tag)
    }

    /// `true` if every tag of `query` is present.  An empty query matches.
    pub fn contains_all(&self, query: &Tags) -> bool {
        query.labels.iter().all(|t| self.contains(t))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl FromStr for Tags {
    type Err = CoreError;

    /// Parse a whitespace-separated list (`"rod A"`).  Never fails for
    /// input split this way; the `Result` keeps the signature honest if the
    /// tag grammar ever tightens.
    fn from_str(s: &str) -> CoreResult<Self> {
        let mut tags = Tags::new();
        for word in s.split_whitespace() {
            tags.insert(word)?;
        }
        Ok(tags)
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels.join(" "))
    }
}

// ── Taggable ──────────────────────────────────────────────────────────────────

/// Anything that carries a [`Tags`] set.
pub trait Taggable {
    fn tags(&self) -> &Tags;

    #[inline]
    fn has_tag(&self, tag: &str) -> bool {
        self.tags().contains(tag)
    }

    #[inline]
    fn has_all_tags(&self, query: &Tags) -> bool {
        self.tags().contains_all(query)
    }
}

impl Taggable for Tags {
    fn tags(&self) -> &Tags {
        self
    }
}
