//! Disk representation of roles and the compiler that turns it into
//! [`Roles`].
//!
//! A permission declared with routes fans out into one lookup key per route:
//!
//! ```yaml
//! admin:
//!   users:
//!     abilities: [read, update]
//!     routes: ["42"]
//!     resource: User
//! ```
//!
//! compiles to the keys `users` and `users_42`, both granting `read` and
//! `update` on `User`.

use crate::{Ability, Error, Permission, Result, Role, Roles};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::convert::Infallible;
use tracing::{debug, warn};

/// A permission as written in a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiskPermission {
    /// Ability names, e.g. `read` or `all`.
    #[serde(default)]
    pub abilities: Vec<String>,

    /// Route suffixes. Each adds a `<permission>_<route>` lookup key.
    #[serde(default)]
    pub routes: Vec<String>,

    /// Opaque resource tag carried onto every compiled key.
    #[serde(default)]
    pub resource: Option<String>,
}

impl DiskPermission {
    /// Lookup keys this permission compiles to: the declared name first,
    /// then one per route.
    pub fn keys<'a>(&'a self, name: &'a str) -> impl Iterator<Item = String> + 'a {
        std::iter::once(name.to_string())
            .chain(self.routes.iter().map(move |route| format!("{name}_{route}")))
    }
}

/// Permission name to [`DiskPermission`].
pub type DiskRole = BTreeMap<String, DiskPermission>;

/// Role name to [`DiskRole`].
pub type DiskRoles = BTreeMap<String, DiskRole>;

/// Compile disk roles into [`Roles`].
///
/// Unknown ability names degrade to [`Ability::None`], which is never
/// granted. When two declarations produce the same key within a role, the
/// later one in name order wins. Both cases are reported as `warn` events.
pub fn compile(disk: &DiskRoles) -> Roles {
    let result = build(disk, |err| -> std::result::Result<(), Infallible> {
        warn!(error = %err, "lenient role compilation");
        Ok(())
    });
    match result {
        Ok(roles) => roles,
        Err(never) => match never {},
    }
}

/// Compile disk roles, rejecting unknown ability names and key collisions.
///
/// # Errors
/// - [`Error::UnknownAbility`] for an ability name that does not parse.
/// - [`Error::KeyCollision`] when two keys in one role coincide.
pub fn compile_strict(disk: &DiskRoles) -> Result<Roles> {
    build(disk, Err)
}

fn build<E>(
    disk: &DiskRoles,
    mut on_issue: impl FnMut(Error) -> std::result::Result<(), E>,
) -> std::result::Result<Roles, E> {
    let mut roles = Roles::new();

    for (role_name, disk_role) in disk {
        let mut role = Role::new();

        for (name, disk_permission) in disk_role {
            let mut abilities = HashSet::with_capacity(disk_permission.abilities.len());
            for value in &disk_permission.abilities {
                let ability = match Ability::try_parse(value) {
                    Some(ability) => ability,
                    None => {
                        on_issue(Error::UnknownAbility {
                            role: role_name.clone(),
                            permission: name.clone(),
                            value: value.clone(),
                        })?;
                        Ability::None
                    }
                };
                abilities.insert(ability);
            }

            let permission = Permission {
                abilities,
                resource: disk_permission.resource.clone(),
            };

            for key in disk_permission.keys(name) {
                if role.contains(&key) {
                    on_issue(Error::KeyCollision {
                        role: role_name.clone(),
                        key: key.clone(),
                    })?;
                }
                role.insert(key, permission.clone());
            }
        }

        debug!(role = %role_name, permissions = role.len(), "compiled role");
        roles.insert(role_name.clone(), role);
    }

    Ok(roles)
}
