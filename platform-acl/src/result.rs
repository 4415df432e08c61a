//! Examination results
//!
//! A [`ResultSet`] is the snapshot of roles matched by one
//! [`Manager::examine`](crate::Manager::examine) call. Right queries on it
//! aggregate over every matched role.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::rights::RightSet;
use crate::role::{Role, Visited};

/// Roles matched by an examination, keyed by id.
///
/// A result set has no mutation API; each examination produces a fresh one.
///
/// # Example
///
/// ```
/// use platform_acl::{ResultSet, Role};
///
/// let writer: Role<()> = Role::new("writer").grant(["news.create"]);
/// let moderator: Role<()> = Role::new("moderator").grant(["news.delete"]);
///
/// let result: ResultSet<()> = [writer, moderator].into_iter().collect();
///
/// // neither role holds both rights, together they do
/// assert!(result.has_all_of(["news.create", "news.delete"]));
/// ```
pub struct ResultSet<P: ?Sized> {
    matches: HashMap<String, Role<P>>,
}

impl<P: ?Sized> ResultSet<P> {
    /// Check whether a role with the given id matched.
    pub fn has_role(&self, id: &str) -> bool {
        self.matches.contains_key(id)
    }

    /// Get the matched role with the given id.
    pub fn get_role(&self, id: &str) -> Option<&Role<P>> {
        self.matches.get(id)
    }

    /// Check that at least one matched role holds the right.
    pub fn has(&self, right: &str) -> bool {
        let mut visited = Visited::new();
        self.matches
            .values()
            .any(|role| role.walk(&mut visited, &mut |rights: &RightSet| rights.contains(right)))
    }

    /// Check that at least one matched role holds at least one of the rights.
    pub fn has_one_of<I, S>(&self, rights: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        rights.into_iter().any(|right| self.has(right.as_ref()))
    }

    /// Check that every right is held by some matched role.
    ///
    /// Different rights may be satisfied by different roles. Repeated rights
    /// count once and an empty list is satisfied.
    pub fn has_all_of<I, S>(&self, rights: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let requested: Vec<S> = rights.into_iter().collect();
        let mut pending: HashSet<&str> = requested.iter().map(AsRef::as_ref).collect();

        // ancestors shared by several matched roles are walked once
        let mut visited = Visited::new();
        for role in self.matches.values() {
            if pending.is_empty() {
                break;
            }
            role.resolve(&mut pending, &mut visited);
        }

        pending.is_empty()
    }

    /// Get the number of matched roles.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Check if no role matched.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Iterate over the matched roles in no particular order.
    pub fn roles(&self) -> impl Iterator<Item = &Role<P>> + '_ {
        self.matches.values()
    }

    /// Iterate over the matched ids in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.matches.keys().map(String::as_str)
    }

    /// Get the union of the effective rights of all matched roles.
    pub fn effective_rights(&self) -> RightSet {
        let mut rights = RightSet::new();
        let mut visited = Visited::new();
        for role in self.matches.values() {
            role.walk(&mut visited, &mut |own: &RightSet| {
                rights.merge(own);
                false
            });
        }
        rights
    }
}

/// Later roles replace earlier ones sharing the same id.
impl<P: ?Sized> FromIterator<Role<P>> for ResultSet<P> {
    fn from_iter<T: IntoIterator<Item = Role<P>>>(iter: T) -> Self {
        Self {
            matches: iter
                .into_iter()
                .map(|role| (role.id().to_string(), role))
                .collect(),
        }
    }
}

impl<P: ?Sized> Clone for ResultSet<P> {
    fn clone(&self) -> Self {
        Self {
            matches: self.matches.clone(),
        }
    }
}

impl<P: ?Sized> fmt::Debug for ResultSet<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("matches", &self.matches)
            .finish()
    }
}
