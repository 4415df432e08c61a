//! # Rights
//!
//! The storage behind every role: an ordered, duplicate-free collection of
//! right strings. Rights are opaque tokens compared by exact value; dotted
//! names such as `news.create` are a caller convention only.

use serde::{Deserialize, Serialize};

/// A sorted set of granted rights.
///
/// Rights are kept in ascending order at all times so membership can be
/// resolved with a binary search. Every insertion places the right at its
/// sorted position, so no mutation ever leaves the set unordered.
///
/// # Example
///
/// ```
/// use platform_acl::RightSet;
///
/// let mut set = RightSet::new();
/// set.insert("news.edit");
/// set.insert("news.create");
/// set.insert("news.edit");
///
/// assert_eq!(set.len(), 2);
/// assert!(set.contains("news.create"));
/// assert_eq!(set.iter().collect::<Vec<_>>(), vec!["news.create", "news.edit"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RightSet {
    rights: Vec<String>,
}

impl RightSet {
    /// Create a new empty right set.
    pub fn new() -> Self {
        Self { rights: Vec::new() }
    }

    /// Add a right to the set.
    ///
    /// # Returns
    ///
    /// `true` if the right was newly added, `false` if it was already present
    pub fn insert(&mut self, right: impl Into<String>) -> bool {
        let right = right.into();
        match self.position(&right) {
            Ok(_) => false,
            Err(index) => {
                self.rights.insert(index, right);
                true
            }
        }
    }

    /// Remove a right from the set.
    ///
    /// # Returns
    ///
    /// `true` if the right was present, `false` otherwise
    pub fn remove(&mut self, right: &str) -> bool {
        match self.position(right) {
            Ok(index) => {
                self.rights.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Check if the set contains a right.
    pub fn contains(&self, right: &str) -> bool {
        self.position(right).is_ok()
    }

    /// Get the count of rights.
    pub fn len(&self) -> usize {
        self.rights.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rights.is_empty()
    }

    /// Iterate over the rights in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.rights.iter().map(String::as_str)
    }

    /// Merge another right set into this one.
    pub fn merge(&mut self, other: &RightSet) {
        for right in &other.rights {
            self.insert(right.as_str());
        }
    }

    /// Check if this set contains every right of another set.
    pub fn contains_all(&self, other: &RightSet) -> bool {
        other.iter().all(|right| self.contains(right))
    }

    /// Check if this set contains at least one right of another set.
    pub fn contains_any(&self, other: &RightSet) -> bool {
        other.iter().any(|right| self.contains(right))
    }

    fn position(&self, right: &str) -> Result<usize, usize> {
        self.rights.binary_search_by(|probe| probe.as_str().cmp(right))
    }
}

impl<S: Into<String>> FromIterator<S> for RightSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut set = RightSet::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<String>> Extend<S> for RightSet {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        for right in iter {
            self.insert(right);
        }
    }
}

impl From<Vec<String>> for RightSet {
    fn from(mut rights: Vec<String>) -> Self {
        rights.sort();
        rights.dedup();
        Self { rights }
    }
}

impl From<RightSet> for Vec<String> {
    fn from(set: RightSet) -> Self {
        set.rights
    }
}
