//! # Roles
//!
//! A role bundles granted rights under an identifier, may inherit from other
//! roles and may carry an examiner deciding whether it applies to a payload.
//!
//! ## Inheritance
//!
//! Two inheritance operations exist and they are deliberately not
//! interchangeable:
//!
//! - [`Role::extend`] links parents by reference. Membership is resolved
//!   against the parents at query time, so later changes to a parent are
//!   visible to every child.
//! - [`Role::acquire_from`] copies the current effective rights of the source
//!   roles into the role's own set. Later changes to a source are invisible,
//!   and the copied rights can be revoked from the child like any other.
//!
//! ```text
//! admin ──extend──> editor ──extend──> user
//!   own: news.delete   own: news.*        own: profile.edit
//!
//! admin.has("profile.edit") resolves admin → editor → user
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::error::{AclError, AclResult};
use crate::examiner::Examiner;
use crate::rights::RightSet;

/// Roles already walked during one traversal, by address.
pub(crate) type Visited = HashSet<*const ()>;

/// Shared handle to a role.
///
/// Cloning a `Role` yields another handle to the same role: grants made
/// through one handle are visible through all of them. Mutating methods take
/// `&self` and hand back a handle to the same role, so configuration can be
/// chained.
///
/// The identifier is only required to be unique within a
/// [`Manager`](crate::Manager); unregistered roles may share one.
///
/// # Example
///
/// ```
/// use platform_acl::Role;
///
/// let user: Role<()> = Role::new("user").grant(["profile.edit"]);
/// let editor: Role<()> = Role::new("editor")
///     .extend([&user])
///     .unwrap()
///     .grant(["news.list", "news.create", "news.edit"]);
///
/// assert!(editor.has("profile.edit"));
/// assert!(editor.has_all_of(["news.list", "news.edit"]));
/// assert!(!user.has("news.list"));
/// ```
pub struct Role<P: ?Sized> {
    shared: Arc<Shared<P>>,
}

struct Shared<P: ?Sized> {
    id: String,
    state: RwLock<State<P>>,
}

struct State<P: ?Sized> {
    rights: RightSet,
    parents: Vec<Role<P>>,
    examiner: Option<Arc<dyn Examiner<P>>>,
}

impl<P: ?Sized> Role<P> {
    /// Create a new role without rights, parents or examiner.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(Shared {
                id: id.into(),
                state: RwLock::new(State {
                    rights: RightSet::new(),
                    parents: Vec::new(),
                    examiner: None,
                }),
            }),
        }
    }

    /// Get the role identifier.
    pub fn id(&self) -> &str {
        &self.shared.id
    }

    /// Check whether two handles refer to the same role.
    pub fn ptr_eq(&self, other: &Role<P>) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Add the given rights to the role.
    ///
    /// Rights already granted are ignored. Rights are stored verbatim, so
    /// `News.Edit` and `news.edit` are different rights.
    ///
    /// # Example
    ///
    /// ```
    /// use platform_acl::Role;
    ///
    /// let role: Role<()> = Role::new("a").grant(["right.a", "right.b", "right.a"]);
    /// assert_eq!(role.rights().len(), 2);
    /// ```
    pub fn grant<I, S>(&self, rights: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write().rights.extend(rights);
        self.clone()
    }

    /// Remove the given rights from the role's own set.
    ///
    /// Rights not granted directly are ignored. Parents are never touched, so
    /// a right still held by a linked parent stays effective.
    pub fn revoke<I, S>(&self, rights: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        {
            let mut state = self.write();
            for right in rights {
                state.rights.remove(right.as_ref());
            }
        }
        self.clone()
    }

    /// Inherit from the given roles by reference.
    ///
    /// Parents are resolved live on every query. A parent already linked is
    /// not linked twice.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::InheritanceCycle`] when a parent is this role or
    /// already inherits from it. No parent of the batch is linked in that case.
    pub fn extend<'a, I>(&self, parents: I) -> AclResult<Self>
    where
        I: IntoIterator<Item = &'a Role<P>>,
        P: 'a,
    {
        let parents: Vec<&Role<P>> = parents.into_iter().collect();

        for parent in &parents {
            if parent.ptr_eq(self) || parent.inherits_from(self) {
                warn!(role = %self.id(), parent = %parent.id(), "Rejected inheritance cycle");
                return Err(AclError::InheritanceCycle {
                    role: self.id().to_string(),
                    parent: parent.id().to_string(),
                });
            }
        }

        {
            let mut state = self.write();
            for parent in parents {
                if !state.parents.iter().any(|linked| linked.ptr_eq(parent)) {
                    state.parents.push(parent.clone());
                }
            }
        }

        Ok(self.clone())
    }

    /// Copy the current effective rights of the given roles into this role.
    ///
    /// This is a snapshot: rights granted to or revoked from a source later
    /// do not reach this role.
    ///
    /// # Example
    ///
    /// ```
    /// use platform_acl::Role;
    ///
    /// let guest: Role<()> = Role::new("guest").grant(["register"]);
    /// let user: Role<()> = Role::new("user").acquire_from([&guest]).revoke(["register"]);
    ///
    /// assert!(guest.has("register"));
    /// assert!(!user.has("register"));
    /// ```
    pub fn acquire_from<'a, I>(&self, sources: I) -> Self
    where
        I: IntoIterator<Item = &'a Role<P>>,
        P: 'a,
    {
        let acquired: Vec<RightSet> = sources.into_iter().map(Role::effective_rights).collect();

        {
            let mut state = self.write();
            for rights in &acquired {
                state.rights.merge(rights);
            }
        }

        self.clone()
    }

    /// Check that the right is held, directly or through a linked parent.
    pub fn has(&self, right: &str) -> bool {
        self.walk(&mut Visited::new(), &mut |rights: &RightSet| rights.contains(right))
    }

    /// Check that at least one of the given rights is held.
    pub fn has_one_of<I, S>(&self, rights: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        rights.into_iter().any(|right| self.has(right.as_ref()))
    }

    /// Check that every one of the given rights is held.
    ///
    /// Repeated rights count once and an empty list is satisfied.
    ///
    /// # Example
    ///
    /// ```
    /// use platform_acl::Role;
    ///
    /// let role: Role<()> = Role::new("r").grant(["a", "b", "c"]);
    /// assert!(role.has_all_of(["a", "b", "c"]));
    /// assert!(role.has_all_of(["a", "a", "b"]));
    /// assert!(!role.has_all_of(["a", "d"]));
    /// ```
    pub fn has_all_of<I, S>(&self, rights: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let requested: Vec<S> = rights.into_iter().collect();
        let mut pending: HashSet<&str> = requested.iter().map(AsRef::as_ref).collect();
        self.resolve(&mut pending, &mut Visited::new());
        pending.is_empty()
    }

    /// Strike every pending right held by this role or an ancestor not yet
    /// in `visited`.
    ///
    /// The own set is consulted first, then each parent depth-first. The walk
    /// stops as soon as nothing is pending.
    pub(crate) fn resolve(&self, pending: &mut HashSet<&str>, visited: &mut Visited) {
        if pending.is_empty() {
            return;
        }

        self.walk(visited, &mut |rights: &RightSet| {
            pending.retain(|right| !rights.contains(right));
            pending.is_empty()
        });
    }

    /// Visit the own set of this role and of every ancestor, each role at
    /// most once, depth-first. Stops as soon as `visit` returns `true`.
    pub(crate) fn walk(
        &self,
        visited: &mut Visited,
        visit: &mut dyn FnMut(&RightSet) -> bool,
    ) -> bool {
        if !visited.insert(self.key()) {
            return false;
        }

        let state = self.read();
        if visit(&state.rights) {
            return true;
        }

        state
            .parents
            .iter()
            .any(|parent| parent.walk(visited, visit))
    }

    /// Get the rights granted directly to this role.
    pub fn rights(&self) -> RightSet {
        self.read().rights.clone()
    }

    /// Get the union of the role's own rights and those of all ancestors.
    pub fn effective_rights(&self) -> RightSet {
        let mut rights = RightSet::new();
        self.walk(&mut Visited::new(), &mut |own: &RightSet| {
            rights.merge(own);
            false
        });
        rights
    }

    /// Get the directly linked parents.
    pub fn parents(&self) -> Vec<Role<P>> {
        self.read().parents.clone()
    }

    /// Check whether `ancestor` is reachable through linked parents.
    pub fn inherits_from(&self, ancestor: &Role<P>) -> bool {
        let mut visited = Visited::new();
        self.read()
            .parents
            .iter()
            .any(|parent| parent.reaches(ancestor, &mut visited))
    }

    fn reaches(&self, target: &Role<P>, visited: &mut Visited) -> bool {
        if self.ptr_eq(target) {
            return true;
        }
        if !visited.insert(self.key()) {
            return false;
        }

        self.read()
            .parents
            .iter()
            .any(|parent| parent.reaches(target, visited))
    }

    fn key(&self) -> *const () {
        Arc::as_ptr(&self.shared).cast()
    }

    /// Set the examiner, replacing any previous one.
    ///
    /// The examiner decides whether the role is part of the
    /// [`ResultSet`](crate::ResultSet) produced by
    /// [`Manager::examine`](crate::Manager::examine).
    ///
    /// # Example
    ///
    /// ```
    /// use platform_acl::{Manager, Role};
    ///
    /// struct User {
    ///     is_admin: bool,
    /// }
    ///
    /// let admin: Role<User> = Role::new("admin")
    ///     .grant(["godmode"])
    ///     .set_examiner(|user: &User| user.is_admin);
    ///
    /// let mut manager = Manager::new();
    /// manager.register([admin]).unwrap();
    ///
    /// let result = manager.examine(&User { is_admin: true });
    /// assert!(result.has("godmode"));
    /// ```
    pub fn set_examiner<E>(&self, examiner: E) -> Self
    where
        E: Examiner<P> + 'static,
    {
        self.write().examiner = Some(Arc::new(examiner));
        self.clone()
    }

    /// Check whether an examiner is set.
    pub fn has_examiner(&self) -> bool {
        self.read().examiner.is_some()
    }

    /// Run the examiner against the payload.
    ///
    /// Without examiner the role never matches.
    pub(crate) fn examine(&self, payload: &P) -> bool {
        let examiner = self.read().examiner.clone();
        match examiner {
            Some(examiner) => examiner.examine(payload),
            None => false,
        }
    }

    // A panic while holding the lock cannot leave the state half-written:
    // every mutation is a single call on RightSet or Vec.
    fn read(&self) -> RwLockReadGuard<'_, State<P>> {
        self.shared
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State<P>> {
        self.shared
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: ?Sized> Clone for Role<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P: ?Sized> fmt::Debug for Role<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        let parents: Vec<&str> = state.parents.iter().map(Role::id).collect();
        f.debug_struct("Role")
            .field("id", &self.id())
            .field("rights", &state.rights)
            .field("parents", &parents)
            .field("has_examiner", &state.examiner.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestRole = Role<()>;

    #[test]
    fn test_new_role() {
        let role = TestRole::new("test");
        assert_eq!(role.id(), "test");
        assert!(role.rights().is_empty());
        assert!(role.parents().is_empty());
        assert!(!role.has_examiner());
    }

    #[test]
    fn test_grant_returns_same_role() {
        let role = TestRole::new("test");
        let chained = role.grant(["a"]);
        assert!(chained.ptr_eq(&role));
        assert!(role.has("a"));
    }

    #[test]
    fn test_grant_sorts_and_dedups() {
        let role = TestRole::new("test").grant(["c", "a"]).grant(["b", "a"]);
        assert_eq!(role.rights().iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_revoke() {
        let role = TestRole::new("test").grant(["a", "b", "c"]).revoke(["b"]);
        assert_eq!(role.rights().iter().collect::<Vec<_>>(), vec!["a", "c"]);

        // revoking twice or revoking unknown rights changes nothing
        role.revoke(["b", "missing"]);
        assert_eq!(role.rights().iter().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_grant_then_revoke() {
        let role = TestRole::new("test").grant(["x"]).revoke(["x"]);
        assert!(!role.has("x"));
    }

    #[test]
    fn test_has() {
        let role = TestRole::new("test").grant(["a", "b"]);
        assert!(role.has("a"));
        assert!(role.has("b"));
        assert!(!role.has("c"));
    }

    #[test]
    fn test_has_one_of() {
        let role = TestRole::new("test").grant(["a", "b"]);
        assert!(role.has_one_of(["a", "b"]));
        assert!(role.has_one_of(["b", "c"]));
        assert!(!role.has_one_of(["c", "d"]));
        assert!(!role.has_one_of(Vec::<String>::new()));
    }

    #[test]
    fn test_has_all_of() {
        let role = TestRole::new("test").grant(["a", "b"]);
        assert!(role.has_all_of(["a", "b"]));
        assert!(!role.has_all_of(["b", "c"]));
        assert!(!role.has_all_of(["c", "d"]));
    }

    #[test]
    fn test_has_all_of_ignores_duplicates() {
        let role = TestRole::new("test").grant(["a", "b"]);
        assert_eq!(role.has_all_of(["a", "a", "b"]), role.has_all_of(["a", "b"]));
        assert!(role.has_all_of(["a", "a"]));
        assert!(!role.has_all_of(["c", "c"]));
    }

    #[test]
    fn test_has_all_of_empty_is_vacuously_true() {
        let role = TestRole::new("test");
        assert!(role.has_all_of(Vec::<&str>::new()));
    }

    #[test]
    fn test_has_all_of_across_ancestors() {
        let base = TestRole::new("base").grant(["a"]);
        let middle = TestRole::new("middle").grant(["b"]);
        let role = TestRole::new("role")
            .extend([&base, &middle])
            .unwrap()
            .grant(["c"]);

        assert!(role.has_all_of(["a", "b", "c"]));
        assert!(role.has_all_of(["c", "b", "a", "a"]));
        assert!(!role.has_all_of(["a", "b", "c", "d"]));
    }

    #[test]
    fn test_acquire_from_copies_rights() {
        let r1 = TestRole::new("r1").grant(["a", "b"]);
        let r2 = TestRole::new("r2").grant(["c", "d"]);

        assert!(r2.acquire_from([&r1]).ptr_eq(&r2));
        assert!(r1.acquire_from([&r2]).ptr_eq(&r1));

        let expected = vec!["a", "b", "c", "d"];
        assert_eq!(r1.rights().iter().collect::<Vec<_>>(), expected);
        assert_eq!(r2.rights().iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_acquire_from_is_a_snapshot() {
        let parent = TestRole::new("parent").grant(["a"]);
        let child = TestRole::new("child").acquire_from([&parent]);

        parent.grant(["b"]).revoke(["a"]);

        assert!(child.has("a"));
        assert!(!child.has("b"));
    }

    #[test]
    fn test_acquire_from_copies_inherited_rights() {
        let base = TestRole::new("base").grant(["a"]);
        let linked = TestRole::new("linked").extend([&base]).unwrap().grant(["b"]);
        let copy = TestRole::new("copy").acquire_from([&linked]);

        assert!(copy.parents().is_empty());
        assert_eq!(copy.rights().iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_extend_is_live() {
        let parent = TestRole::new("parent").grant(["a"]);
        let child = TestRole::new("child").extend([&parent]).unwrap();

        parent.grant(["b"]);
        assert!(child.has("b"));

        parent.revoke(["a"]);
        assert!(!child.has("a"));
    }

    #[test]
    fn test_child_revoke_does_not_touch_parent() {
        let parent = TestRole::new("parent").grant(["a"]);
        let child = TestRole::new("child").extend([&parent]).unwrap().grant(["a"]);

        child.revoke(["a"]);
        assert!(parent.has("a"));
        // still effective through the parent
        assert!(child.has("a"));
        assert!(child.rights().is_empty());
    }

    #[test]
    fn test_extend_links_parent_once() {
        let parent = TestRole::new("parent");
        let child = TestRole::new("child").extend([&parent, &parent]).unwrap();
        child.extend([&parent]).unwrap();
        assert_eq!(child.parents().len(), 1);
    }

    #[test]
    fn test_extend_rejects_self() {
        let role = TestRole::new("role");
        let err = role.extend([&role]).unwrap_err();
        assert_eq!(
            err,
            AclError::InheritanceCycle {
                role: "role".to_string(),
                parent: "role".to_string(),
            }
        );
        assert!(role.parents().is_empty());
    }

    #[test]
    fn test_extend_rejects_cycle() {
        let user = TestRole::new("user");
        let editor = TestRole::new("editor").extend([&user]).unwrap();
        let admin = TestRole::new("admin").extend([&editor]).unwrap();
        let other = TestRole::new("other");

        let err = user.extend([&other, &admin]).unwrap_err();
        assert_eq!(err.error_code(), "INHERITANCE_CYCLE");
        // nothing of the rejected batch is linked
        assert!(user.parents().is_empty());
    }

    #[test]
    fn test_roles_with_same_id_are_distinct() {
        let a = TestRole::new("same");
        let b = TestRole::new("same");
        assert!(!a.ptr_eq(&b));
        assert!(b.extend([&a]).is_ok());
    }

    #[test]
    fn test_diamond_inheritance() {
        let base = TestRole::new("base").grant(["base.read"]);
        let left = TestRole::new("left").extend([&base]).unwrap().grant(["left"]);
        let right = TestRole::new("right").extend([&base]).unwrap().grant(["right"]);
        let top = TestRole::new("top").extend([&left, &right]).unwrap();

        assert!(top.inherits_from(&base));
        assert!(!base.inherits_from(&top));
        assert_eq!(
            top.effective_rights().iter().collect::<Vec<_>>(),
            vec!["base.read", "left", "right"]
        );
    }

    /// Stack `levels` diamonds: each level's two sides extend the previous
    /// top, and the new top extends both sides.
    fn diamond_ladder(levels: usize) -> (TestRole, TestRole) {
        let bottom = TestRole::new("level-0").grant(["bottom.read"]);
        let mut top = bottom.clone();
        for level in 1..=levels {
            let left = TestRole::new(format!("left-{}", level))
                .extend([&top])
                .unwrap();
            let right = TestRole::new(format!("right-{}", level))
                .extend([&top])
                .unwrap()
                .grant([format!("right-{}.read", level)]);
            top = TestRole::new(format!("level-{}", level))
                .extend([&left, &right])
                .unwrap();
        }
        (bottom, top)
    }

    #[test]
    fn test_diamond_ladder_walks_each_ancestor_once() {
        // 2^64 paths lead from top to bottom; only the 193 roles may be walked
        let (bottom, top) = diamond_ladder(64);

        assert!(top.has("bottom.read"));
        assert!(!top.has("missing.right"));
        assert!(!top.has_one_of(["missing.a", "missing.b"]));
        assert!(top.has_all_of(["bottom.read", "right-1.read", "right-64.read"]));
        assert!(!top.has_all_of(["bottom.read", "missing.right"]));
        assert!(top.inherits_from(&bottom));
        assert!(!bottom.inherits_from(&top));
        assert_eq!(top.effective_rights().len(), 65);

        let err = bottom.extend([&top]).unwrap_err();
        assert_eq!(err.error_code(), "INHERITANCE_CYCLE");
    }

    #[test]
    fn test_set_examiner() {
        let role = TestRole::new("test");
        assert!(!role.has_examiner());

        role.set_examiner(|_: &()| false);
        assert!(role.has_examiner());
    }

    #[test]
    fn test_examine() {
        let role = TestRole::new("test");
        assert!(!role.examine(&()));

        role.set_examiner(|_: &()| true);
        assert!(role.examine(&()));

        // replaced, not combined
        role.set_examiner(|_: &()| false);
        assert!(!role.examine(&()));
    }

    #[test]
    fn test_debug_output() {
        let parent = TestRole::new("parent");
        let role = TestRole::new("role").extend([&parent]).unwrap().grant(["a"]);
        let debug = format!("{:?}", role);
        assert!(debug.contains("\"role\""));
        assert!(debug.contains("\"parent\""));
        assert!(debug.contains("has_examiner: false"));
    }
}
