//! # Platform Access Control
//!
//! This crate provides in-process role evaluation for the Relay platform,
//! shared across Verity, NoteMan, and ShipCheck applications.
//!
//! ## Overview
//!
//! The platform-acl crate handles:
//! - **Rights**: Opaque permission strings kept in sorted sets
//! - **Roles**: Named bundles of rights with inheritance and an examiner
//! - **Manager**: Registry of uniquely identified roles
//! - **Result Sets**: Roles matched by evaluating a payload
//!
//! ## Architecture
//!
//! ```text
//! Role ── grant / revoke ──> RightSet
//!   │
//!   ├── extend ──────> parent roles (resolved live)
//!   ├── acquire_from ─> source rights (copied once)
//!   └── examiner ─────> fn(&Payload) -> bool
//!
//! Manager::examine(&payload) ──> ResultSet (roles whose examiner matched)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use platform_acl::{Manager, Role};
//!
//! struct User {
//!     roles: Vec<&'static str>,
//! }
//!
//! fn member_of(id: &'static str) -> impl Fn(&User) -> bool + Send + Sync {
//!     move |user: &User| user.roles.contains(&id)
//! }
//!
//! let user = Role::new("user")
//!     .grant(["profile.edit"])
//!     .set_examiner(member_of("user"));
//! let editor = Role::new("editor")
//!     .extend([&user])?
//!     .grant(["news.list", "news.create", "news.edit"])
//!     .set_examiner(member_of("editor"));
//!
//! let mut manager = Manager::new();
//! manager.register([user, editor])?;
//!
//! let result = manager.examine(&User { roles: vec!["editor"] });
//! assert!(result.has_role("editor"));
//! assert!(result.has_all_of(["profile.edit", "news.edit"]));
//! assert!(!result.has("news.delete"));
//! # Ok::<(), platform_acl::AclError>(())
//! ```
//!
//! ## Payloads
//!
//! Roles, managers and result sets are generic over the payload type handed
//! to examiners. Use a concrete type when every caller evaluates the same
//! kind of record, or `dyn Any + Send + Sync` when payloads vary and
//! examiners downcast.
//!
//! ## Concurrency
//!
//! Roles are shared handles guarded by read-write locks, and all public
//! types are `Send + Sync`. Build the roles and the manager first; queries
//! may then run from any number of threads.

pub mod config;
pub mod error;
pub mod examiner;
pub mod manager;
pub mod result;
pub mod rights;
pub mod role;

// Re-export main types for convenience
pub use config::{ManagerConfig, RegistrationMode};
pub use error::{AclError, AclResult};
pub use examiner::Examiner;
pub use manager::Manager;
pub use result::ResultSet;
pub use rights::RightSet;
pub use role::Role;
