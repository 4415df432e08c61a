//! Error types for access control operations
//!
//! Only two conditions are reported as errors: registering a role under an
//! identifier that is already taken, and wiring an inheritance link that would
//! close a cycle. Unknown role lookups are `None`, not errors.

use thiserror::Error;

/// Access control error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AclError {
    /// A role with the same identifier is already registered.
    #[error("cannot register role {id} (on position {position}) because the id is already in use")]
    DuplicateRole {
        /// The colliding role identifier.
        id: String,
        /// Zero-based position of the role within the registration batch.
        position: usize,
    },

    /// Linking the parent would make the role inherit from itself.
    #[error("role {role} cannot extend {parent}: inheritance cycle")]
    InheritanceCycle {
        /// The role being extended.
        role: String,
        /// The rejected parent.
        parent: String,
    },
}

/// Result type for access control operations.
pub type AclResult<T> = Result<T, AclError>;

impl AclError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AclError::DuplicateRole { .. } => "DUPLICATE_ROLE",
            AclError::InheritanceCycle { .. } => "INHERITANCE_CYCLE",
        }
    }
}
