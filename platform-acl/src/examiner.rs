//! # Examiners
//!
//! An examiner decides whether a role applies to a payload supplied by the
//! caller, typically a user record. Payloads are opaque to this crate; they
//! are only forwarded to examiners.

/// Predicate deciding whether a role matches a payload.
///
/// Examiners must be total over `P`: when a payload cannot be interpreted the
/// examiner returns `false` instead of panicking. Any closure of shape
/// `Fn(&P) -> bool` is an examiner.
///
/// # Example
///
/// ```
/// use platform_acl::Examiner;
///
/// struct User {
///     is_admin: bool,
/// }
///
/// let examiner = |user: &User| user.is_admin;
/// assert!(examiner.examine(&User { is_admin: true }));
/// ```
///
/// For payloads of varying shape, use `P = dyn Any + Send + Sync` and downcast
/// inside the examiner:
///
/// ```
/// use platform_acl::Examiner;
/// use std::any::Any;
///
/// type Payload = dyn Any + Send + Sync;
///
/// struct User {
///     is_admin: bool,
/// }
///
/// let examiner = |payload: &Payload| {
///     payload
///         .downcast_ref::<User>()
///         .map(|user| user.is_admin)
///         .unwrap_or(false)
/// };
/// assert!(Examiner::<Payload>::examine(&examiner, &User { is_admin: true }));
/// assert!(!Examiner::<Payload>::examine(&examiner, &"not a user"));
/// ```
pub trait Examiner<P: ?Sized>: Send + Sync {
    /// Check whether the payload satisfies this examiner.
    fn examine(&self, payload: &P) -> bool;
}

impl<P, F> Examiner<P> for F
where
    P: ?Sized,
    F: Fn(&P) -> bool + Send + Sync,
{
    fn examine(&self, payload: &P) -> bool {
        self(payload)
    }
}
