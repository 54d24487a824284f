//! # Key Paths
//!
//! A [`KeyPath`] addresses one position in a nested dictionary. Each segment
//! is a concrete string key, so paths can never describe a cycle.
//!
//! A single `&str` converts to a one-segment path; the string is *not* split
//! on dots. Use an array or `Vec` for multi-segment paths:
//!
//! ```
//! use typedict_core::KeyPath;
//!
//! let nested = KeyPath::from(["l1", "float"]);
//! assert_eq!(nested.len(), 2);
//! assert_eq!(KeyPath::from("a.b").len(), 1);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// An owned sequence of string keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// The empty path, addressing the root of a dictionary.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from owned segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// The segments of this path, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenate `other` onto this path.
    pub fn join(&self, other: &KeyPath) -> KeyPath {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Self(segments)
    }

    /// This path extended by a single key.
    pub fn child(&self, key: impl Into<String>) -> KeyPath {
        let mut segments = self.0.clone();
        segments.push(key.into());
        Self(segments)
    }

    /// The path made of the first `len` segments.
    pub fn prefix(&self, len: usize) -> KeyPath {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }

    /// The final segment, if any.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        f.write_str(&self.0.join("."))
    }
}

impl<'a> IntoIterator for &'a KeyPath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<&str> for KeyPath {
    fn from(key: &str) -> Self {
        Self(vec![key.to_string()])
    }
}

impl From<String> for KeyPath {
    fn from(key: String) -> Self {
        Self(vec![key])
    }
}

impl From<&String> for KeyPath {
    fn from(key: &String) -> Self {
        Self(vec![key.clone()])
    }
}

impl From<&KeyPath> for KeyPath {
    fn from(path: &KeyPath) -> Self {
        path.clone()
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<Vec<&str>> for KeyPath {
    fn from(segments: Vec<&str>) -> Self {
        Self(segments.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for KeyPath {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(segments: [&str; N]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }
}
