//! Users of a 1Password account

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{AccessTo, Accessor, Entity, EntityKind};
use crate::flags::Flag;
use crate::group::Group;
use crate::json::Timestamp;
use crate::vault::Vault;

/// States of users that were invited and still need to set up their account
const INVITED_STATES: [&str; 4] = [
    "T", // pending creation
    "1", "2", // seen in the wild, meaning unknown
    "3", // invited via CLI
];

/// States of users that set up their account and await confirmation
const PENDING_CONFIRMATION_STATES: [&str; 2] = [
    "4", // pending provision, via CLI
    "P", // pending confirmation, via self registration
];

const ACTIVE_STATES: [&str; 1] = ["A"];

const SUSPENDED_STATES: [&str; 1] = ["S"];

const GUEST_TYPES: [&str; 1] = ["G"];

/// A user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "uuid", alias = "id")]
    id: String,
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    language: String,
    created_at: Timestamp,
    updated_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_auth_at: Option<Timestamp>,
    #[serde(default)]
    state: String,
    #[serde(default, rename = "type")]
    user_type: String,
}

impl User {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Change the name; applied by [`Entities::edit`](crate::commands::Entities::edit)
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// First name as derived by the tool from the full name
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Last name as derived by the tool from the full name
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn last_auth_at(&self) -> Option<&Timestamp> {
        self.last_auth_at.as_ref()
    }

    /// Raw state code reported by the tool
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        code_in(&self.state, &ACTIVE_STATES)
    }

    pub fn is_suspended(&self) -> bool {
        code_in(&self.state, &SUSPENDED_STATES)
    }

    /// Whether the user is invited and needs to set up the account before it can be confirmed
    pub fn is_invited(&self) -> bool {
        code_in(&self.state, &INVITED_STATES)
    }

    /// Whether the user has set up the account and is pending confirmation
    pub fn is_pending_confirmation(&self) -> bool {
        code_in(&self.state, &PENDING_CONFIRMATION_STATES)
    }

    pub fn is_guest(&self) -> bool {
        code_in(&self.user_type, &GUEST_TYPES)
    }
}

fn code_in(code: &str, codes: &[&str]) -> bool {
    let code = code.to_uppercase();
    codes.iter().any(|c| *c == code)
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &str {
        &self.id
    }

    fn edit_arguments(&self) -> Vec<Option<String>> {
        vec![Flag::Name.is(Some(&self.name))]
    }
}

impl Accessor for User {}

impl AccessTo<Group> for User {}

impl AccessTo<Vault> for User {}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}
