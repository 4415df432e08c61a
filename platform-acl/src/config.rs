//! Manager configuration.
//!
//! The only tunable is how a registration batch behaves when one of its roles
//! collides with an identifier already in use. Configuration is loaded from
//! environment variables with a default that keeps the historical behaviour.

use serde::{Deserialize, Serialize};

/// How [`Manager::register`](crate::Manager::register) handles a batch
/// containing a duplicate identifier.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationMode {
    /// Roles preceding the duplicate stay registered.
    #[default]
    Partial,

    /// The whole batch is validated first; on error nothing is registered.
    Atomic,
}

impl RegistrationMode {
    /// Parse mode from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use platform_acl::RegistrationMode;
    ///
    /// assert_eq!(RegistrationMode::parse("atomic"), Some(RegistrationMode::Atomic));
    /// assert_eq!(RegistrationMode::parse("PARTIAL"), Some(RegistrationMode::Partial));
    /// assert_eq!(RegistrationMode::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "partial" => Some(Self::Partial),
            "atomic" => Some(Self::Atomic),
            _ => None,
        }
    }

    /// Get string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Partial => "partial",
            Self::Atomic => "atomic",
        }
    }
}

/// Configuration for a [`Manager`](crate::Manager).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Behaviour of registration batches containing a duplicate id.
    #[serde(default)]
    pub registration: RegistrationMode,
}

impl ManagerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ACL_REGISTRATION_MODE`: `partial` or `atomic` (default: partial)
    ///
    /// Unrecognised values fall back to the default.
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            registration: std::env::var("ACL_REGISTRATION_MODE")
                .ok()
                .and_then(|s| RegistrationMode::parse(&s))
                .unwrap_or(default.registration),
        }
    }

    /// Configuration with all-or-nothing registration.
    pub fn atomic() -> Self {
        Self {
            registration: RegistrationMode::Atomic,
        }
    }
}
