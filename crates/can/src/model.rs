//! In-memory permission, role and role-set types.
//!
//! These are the compiled form consulted by every decision. They are built
//! once by the config compiler and only read afterwards.

use crate::Ability;
use crate::config::{self, DiskRoles};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};

/// A role-scoped grant: the abilities allowed on a permission plus an
/// optional resource tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Permission {
    #[serde(serialize_with = "sorted")]
    pub abilities: HashSet<Ability>,
    /// Opaque name of the underlying entity type. Never read by the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

impl Permission {
    pub fn new(abilities: impl IntoIterator<Item = Ability>) -> Self {
        Self {
            abilities: abilities.into_iter().collect(),
            resource: None,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Whether `ability` is in the granted set. Does not apply the
    /// `All`/`Skip` short-circuits; see [`crate::can`] for that.
    pub fn grants(&self, ability: Ability) -> bool {
        self.abilities.contains(&ability)
    }
}

fn sorted<S: Serializer>(abilities: &HashSet<Ability>, serializer: S) -> Result<S::Ok, S::Error> {
    let mut abilities: Vec<Ability> = abilities.iter().copied().collect();
    abilities.sort_unstable();
    abilities.serialize(serializer)
}

/// Permission name to [`Permission`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Role(HashMap<String, Permission>);

impl Role {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, permission: &str) -> Option<&Permission> {
        self.0.get(permission)
    }

    /// Insert a permission, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, permission: Permission) -> Option<Permission> {
        self.0.insert(name.into(), permission)
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.0.contains_key(permission)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Permission)> {
        self.0.iter().map(|(name, permission)| (name.as_str(), permission))
    }

    /// Permission names in sorted order.
    pub fn permission_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<K: Into<String>> FromIterator<(K, Permission)> for Role {
    fn from_iter<I: IntoIterator<Item = (K, Permission)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Role name to [`Role`]. The top-level value produced by config loading.
///
/// Deserializing a `Roles` decodes the disk representation and compiles it,
/// so it can be embedded in an application's own config struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roles(HashMap<String, Role>);

impl Roles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: &str) -> Option<&Role> {
        self.0.get(role)
    }

    pub fn insert(&mut self, name: impl Into<String>, role: Role) -> Option<Role> {
        self.0.insert(name.into(), role)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Role)> {
        self.0.iter().map(|(name, role)| (name.as_str(), role))
    }

    /// Role names in sorted order.
    pub fn role_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<K: Into<String>> FromIterator<(K, Role)> for Roles {
    fn from_iter<I: IntoIterator<Item = (K, Role)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'de> Deserialize<'de> for Roles {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let disk = DiskRoles::deserialize(deserializer)?;
        Ok(config::compile(&disk))
    }
}
