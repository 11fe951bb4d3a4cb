//! op-binding library
//!
//! Typed binding for the 1Password command-line tool. Every operation starts
//! the `op` executable, passes the session token through the environment and
//! parses the JSON output into users, groups and vaults.

pub mod client;
pub mod commands;
pub mod config;
pub mod entity;
pub mod error;
pub mod flags;
pub mod group;
pub mod json;
pub mod op;
pub mod process;
pub mod session;
pub mod user;
pub mod util;
pub mod vault;

// Re-export commonly used items
pub use client::{Credentials, OnePassword, PasswordProvider};
pub use commands::Entities;
pub use config::{Config, DEFAULT_TIMEOUT};
pub use entity::{AccessTo, Accessible, Accessor, Entity, EntityKind, Membership, Named, Role};
pub use error::{Error, Result, SESSION_EXPIRED_SIGNATURES};
pub use flags::{entity_filter, kebab_case, Flag, Subcommand};
pub use group::Group;
pub use json::{deserialize, serialize, Timestamp};
pub use op::{Op, OpExecutor, DEVICE_VARIABLE};
pub use process::{run, Invocation, ProcessOutput};
pub use session::{Session, SESSION_VARIABLE_PREFIX};
pub use user::User;
pub use util::{is_valid_device_id, random_base32, shorthand_from_address};
pub use vault::Vault;
