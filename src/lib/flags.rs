//! Argument builder for the `op` command line
//!
//! Flags are rendered as `--flag-name=value`. A missing value renders as
//! `None`, which the process runner drops before invoking the executable.

use std::fmt;

use crate::entity::{Entity, EntityKind};

/// Flags understood by the `op` executable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Shorthand,
    Raw,
    Cache,
    Config,
    Name,
    Description,
    Language,
    Role,
    User,
    Group,
    Vault,
    AllowAdminsToManage,
    All,
    Version,
}

/// All flags, in declaration order
pub const ALL_FLAGS: [Flag; 14] = [
    Flag::Shorthand,
    Flag::Raw,
    Flag::Cache,
    Flag::Config,
    Flag::Name,
    Flag::Description,
    Flag::Language,
    Flag::Role,
    Flag::User,
    Flag::Group,
    Flag::Vault,
    Flag::AllowAdminsToManage,
    Flag::All,
    Flag::Version,
];

impl Flag {
    /// The flag name without leading dashes
    pub fn name(&self) -> &'static str {
        match self {
            Flag::Shorthand => "shorthand",
            Flag::Raw => "raw",
            Flag::Cache => "cache",
            Flag::Config => "config",
            Flag::Name => "name",
            Flag::Description => "description",
            Flag::Language => "language",
            Flag::Role => "role",
            Flag::User => "user",
            Flag::Group => "group",
            Flag::Vault => "vault",
            Flag::AllowAdminsToManage => "allow-admins-to-manage",
            Flag::All => "all",
            Flag::Version => "version",
        }
    }

    /// Filter flag restricting a listing to entities related to `kind`
    pub fn for_kind(kind: EntityKind) -> Flag {
        match kind {
            EntityKind::User => Flag::User,
            EntityKind::Group => Flag::Group,
            EntityKind::Vault => Flag::Vault,
        }
    }

    /// Render the flag with a value, e.g. `--name=value`.
    /// Returns `None` when the value is `None`.
    pub fn is<S: AsRef<str>>(&self, value: Option<S>) -> Option<String> {
        let value: Option<&str> = value.as_ref().map(|v| v.as_ref());
        set(self.name(), value)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}", self.name())
    }
}

/// Subcommands of the `op` executable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    Signin,
    Signout,
    List,
    Get,
    Create,
    Edit,
    Delete,
    Add,
    Remove,
    Confirm,
    Suspend,
    Reactivate,
}

impl Subcommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subcommand::Signin => "signin",
            Subcommand::Signout => "signout",
            Subcommand::List => "list",
            Subcommand::Get => "get",
            Subcommand::Create => "create",
            Subcommand::Edit => "edit",
            Subcommand::Delete => "delete",
            Subcommand::Add => "add",
            Subcommand::Remove => "remove",
            Subcommand::Confirm => "confirm",
            Subcommand::Suspend => "suspend",
            Subcommand::Reactivate => "reactivate",
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render an arbitrary flag with a value, e.g. `--flag-name=value`.
/// The identifier is converted with [`kebab_case`]. Returns `None` when the
/// value is `None`.
pub fn set(flag: &str, value: Option<&str>) -> Option<String> {
    value.map(|v| format!("--{}={}", kebab_case(flag), v))
}

/// Convert an identifier to kebab case.
///
/// Handles `SCREAMING_SNAKE`, `snake_case`, `camelCase` and `PascalCase`:
/// `ALLOW_ADMINS_TO_MANAGE` and `AllowAdminsToManage` both become
/// `allow-admins-to-manage`.
pub fn kebab_case(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut result = String::with_capacity(identifier.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c == ' ' {
            if !result.is_empty() && !result.ends_with('-') {
                result.push('-');
            }
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !result.ends_with('-') {
                result.push('-');
            }
        }

        result.extend(c.to_lowercase());
    }

    result.trim_end_matches('-').to_string()
}

/// Render a filter flag for an entity, e.g. `--vault=<id>`.
/// Returns `None` when no entity is given.
pub fn entity_filter<E: Entity>(entity: Option<&E>) -> Option<String> {
    entity.and_then(|e| Flag::for_kind(E::KIND).is(Some(e.id())))
}
