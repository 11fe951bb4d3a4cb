//! Groups of users

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{AccessTo, Accessible, Accessor, Entity, EntityKind, Named};
use crate::flags::Flag;
use crate::json::Timestamp;
use crate::vault::Vault;

/// A group of users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(rename = "uuid", alias = "id")]
    id: String,
    name: String,
    #[serde(rename = "desc", default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<Timestamp>,
}

impl Group {
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Time of the last edit. `None` for groups never edited, where the tool
    /// omits the field or reports a placeholder before the creation time.
    pub fn updated_at(&self) -> Option<&Timestamp> {
        self.updated_at
            .as_ref()
            .filter(|updated| *updated >= &self.created_at)
    }
}

impl Entity for Group {
    const KIND: EntityKind = EntityKind::Group;

    fn id(&self) -> &str {
        &self.id
    }

    fn edit_arguments(&self) -> Vec<Option<String>> {
        vec![
            Flag::Name.is(Some(&self.name)),
            Flag::Description.is(self.description.as_ref()),
        ]
    }
}

impl Named for Group {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }
}

impl Accessor for Group {}

impl Accessible for Group {}

impl AccessTo<Vault> for Group {}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
