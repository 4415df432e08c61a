//! Role registry
//!
//! The manager owns the set of roles known to an application, keyed by
//! identifier, and evaluates payloads against all of them at once.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, warn};

use crate::config::{ManagerConfig, RegistrationMode};
use crate::error::{AclError, AclResult};
use crate::result::ResultSet;
use crate::role::Role;

/// Registry of uniquely identified roles.
///
/// The registry only grows: roles enter through [`Manager::register`] or
/// [`Manager::ensure`] and are never removed.
///
/// # Example
///
/// ```
/// use platform_acl::{Manager, Role};
///
/// struct User {
///     roles: Vec<&'static str>,
/// }
///
/// let reader: Role<User> = Role::new("reader")
///     .grant(["news.list"])
///     .set_examiner(|user: &User| user.roles.contains(&"reader"));
///
/// let mut manager = Manager::new();
/// manager.register([reader]).unwrap();
///
/// let result = manager.examine(&User { roles: vec!["reader"] });
/// assert!(result.has_role("reader"));
/// assert!(result.has("news.list"));
/// ```
pub struct Manager<P: ?Sized> {
    registry: HashMap<String, Role<P>>,
    config: ManagerConfig,
}

impl<P: ?Sized> Manager<P> {
    /// Create a new empty manager with default configuration.
    pub fn new() -> Self {
        Self::with_config(ManagerConfig::default())
    }

    /// Create a new empty manager with the given configuration.
    pub fn with_config(config: ManagerConfig) -> Self {
        Self {
            registry: HashMap::new(),
            config,
        }
    }

    /// Get the active configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Transfer the given roles into the registry.
    ///
    /// Each role must carry an identifier not yet in use.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::DuplicateRole`] naming the first colliding id and
    /// its position in `roles`. With [`RegistrationMode::Partial`] the roles
    /// before it remain registered; with [`RegistrationMode::Atomic`] none of
    /// the batch is.
    pub fn register<I>(&mut self, roles: I) -> AclResult<&mut Self>
    where
        I: IntoIterator<Item = Role<P>>,
    {
        match self.config.registration {
            RegistrationMode::Partial => {
                for (position, role) in roles.into_iter().enumerate() {
                    self.insert(position, role)?;
                }
            }
            RegistrationMode::Atomic => {
                let roles: Vec<Role<P>> = roles.into_iter().collect();

                let mut batch = HashSet::new();
                for (position, role) in roles.iter().enumerate() {
                    if self.registry.contains_key(role.id()) || !batch.insert(role.id()) {
                        warn!(role = %role.id(), position, "Rejected registration batch");
                        return Err(AclError::DuplicateRole {
                            id: role.id().to_string(),
                            position,
                        });
                    }
                }

                for (position, role) in roles.into_iter().enumerate() {
                    self.insert(position, role)?;
                }
            }
        }

        Ok(self)
    }

    fn insert(&mut self, position: usize, role: Role<P>) -> AclResult<()> {
        match self.registry.entry(role.id().to_string()) {
            Entry::Occupied(entry) => {
                warn!(role = %entry.key(), position, "Role id already in use");
                Err(AclError::DuplicateRole {
                    id: entry.key().clone(),
                    position,
                })
            }
            Entry::Vacant(entry) => {
                debug!(role = %entry.key(), "Registered role");
                entry.insert(role);
                Ok(())
            }
        }
    }

    /// Get the role with the given id, creating and registering an empty one
    /// if none exists.
    pub fn ensure(&mut self, id: impl Into<String>) -> Role<P> {
        self.registry
            .entry(id.into())
            .or_insert_with_key(|id| {
                debug!(role = %id, "Created role");
                Role::new(id.clone())
            })
            .clone()
    }

    /// Get the role with the given id.
    pub fn get(&self, id: &str) -> Option<&Role<P>> {
        self.registry.get(id)
    }

    /// Check whether a role with the given id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.registry.contains_key(id)
    }

    /// Get the number of registered roles.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Check if no role is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Iterate over the registered roles in no particular order.
    pub fn roles(&self) -> impl Iterator<Item = &Role<P>> + '_ {
        self.registry.values()
    }

    /// Iterate over the registered ids in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.registry.keys().map(String::as_str)
    }

    /// Run every registered role's examiner against the payload.
    ///
    /// Roles whose examiner accepts the payload form the returned
    /// [`ResultSet`]. Roles without examiner never match.
    pub fn examine(&self, payload: &P) -> ResultSet<P> {
        let result: ResultSet<P> = self
            .registry
            .values()
            .filter(|role| role.examine(payload))
            .cloned()
            .collect();

        debug!(
            roles = self.registry.len(),
            matched = result.len(),
            "Examined payload"
        );

        result
    }
}

impl<P: ?Sized> Default for Manager<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized> fmt::Debug for Manager<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("roles", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}
