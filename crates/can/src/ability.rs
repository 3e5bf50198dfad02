//! The ability vocabulary.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// An abstract operation on a permission.
///
/// The four concrete abilities map onto the usual CRUD verbs. `All` and
/// `Skip` are control sentinels and are decided without consulting the
/// caller's predicate. `None` is the denial sentinel: it is what unknown
/// strings parse to, and it is never granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ability {
    /// Read access to a resource.
    Read,
    /// Create a resource.
    Create,
    /// Update a resource.
    Update,
    /// Delete a resource.
    Delete,
    /// Every concrete ability on the permission.
    All,
    /// Authorization intentionally bypassed, e.g. for `OPTIONS` requests or
    /// when the check happens later in the request chain.
    Skip,
    /// No access. Also the result of parsing an unknown string.
    None,
}

impl Ability {
    /// The concrete abilities, in order.
    pub const CONCRETE: [Ability; 4] = [
        Ability::Read,
        Ability::Create,
        Ability::Update,
        Ability::Delete,
    ];

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Ability::Read => "read",
            Ability::Create => "create",
            Ability::Update => "update",
            Ability::Delete => "delete",
            Ability::All => "all",
            Ability::Skip => "skip",
            Ability::None => "none",
        }
    }

    /// Parse a case-insensitive ability name.
    ///
    /// Unknown names yield [`Ability::None`]; callers treat that as
    /// "could not parse".
    pub fn parse(value: &str) -> Ability {
        Self::try_parse(value).unwrap_or(Ability::None)
    }

    /// Parse a case-insensitive ability name, returning `None` for anything
    /// that is not one of the six grantable names.
    pub fn try_parse(value: &str) -> Option<Ability> {
        let value = value.trim();
        [
            Ability::Read,
            Ability::Create,
            Ability::Update,
            Ability::Delete,
            Ability::All,
            Ability::Skip,
        ]
        .into_iter()
        .find(|ability| ability.as_str().eq_ignore_ascii_case(value))
    }

    pub fn is_concrete(self) -> bool {
        matches!(
            self,
            Ability::Read | Ability::Create | Ability::Update | Ability::Delete
        )
    }

    pub fn is_sentinel(self) -> bool {
        !self.is_concrete()
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ability {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Ability::parse(value))
    }
}

impl Serialize for Ability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Ability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Ability::parse(&value))
    }
}
