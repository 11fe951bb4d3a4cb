//! Entity model shared by users, groups and vaults
//!
//! Entities are value objects materialized from a single JSON response. The
//! id is assigned by the tool and never changes locally; only the fields an
//! entity lists in [`Entity::edit_arguments`] are written back by an edit.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// The closed set of entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Group,
    Vault,
}

impl EntityKind {
    /// Keyword used by `get`, `create`, `edit`, `delete`, `add` and `remove`
    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Group => "group",
            EntityKind::Vault => "vault",
        }
    }

    /// Keyword used by `list`
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Group => "groups",
            EntityKind::Vault => "vaults",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// An object managed by the tool, identified by an opaque id
pub trait Entity: Serialize + DeserializeOwned {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Flags written back by an edit
    fn edit_arguments(&self) -> Vec<Option<String>>;
}

/// An entity with a display name and optional description
pub trait Named: Entity {
    fn name(&self) -> &str;
    fn set_name(&mut self, name: impl Into<String>);
    fn description(&self) -> Option<&str>;

    /// Change the description written back by an edit.
    ///
    /// `None` leaves the stored description unchanged; an empty string clears it.
    fn set_description(&mut self, description: Option<String>);
}

/// Entities that can be granted access (users and groups)
pub trait Accessor: Entity {}

/// Entities access can be granted to (groups and vaults)
pub trait Accessible: Entity {}

/// Valid accessor/accessible pairs
pub trait AccessTo<A: Accessible>: Accessor {}

/// Permission level of an access grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Member,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Manager => "manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "manager" => Ok(Role::Manager),
            other => Err(Error::Deserialize {
                message: format!("unknown role \"{}\"", other),
                json: s.to_string(),
            }),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An entity listed together with its role, e.g. a user in a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "E: Entity")]
pub struct Membership<E> {
    #[serde(flatten)]
    pub entity: E,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_keywords() {
        assert_eq!(EntityKind::User.singular(), "user");
        assert_eq!(EntityKind::Group.plural(), "groups");
        assert_eq!(EntityKind::Vault.to_string(), "vault");
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"manager\"");
        assert_eq!(Role::Member.to_string(), "member");
    }

    #[test]
    fn test_role_parsing_is_case_insensitive() {
        assert_eq!("MEMBER".parse::<Role>().unwrap(), Role::Member);
        assert_eq!(
            serde_json::from_str::<Role>("\"Manager\"").unwrap(),
            Role::Manager
        );
        assert!("owner".parse::<Role>().is_err());
    }
}
