//! Entity commands
//!
//! [`Entities`] groups the operations on one entity kind. Each operation
//! builds the argument list, runs it through the client's managed session and
//! deserializes the output.

use std::marker::PhantomData;

use crate::client::OnePassword;
use crate::entity::{AccessTo, Accessible, Accessor, Entity, Membership, Role};
use crate::error::{Error, Result};
use crate::flags::{entity_filter, Flag, Subcommand};
use crate::group::Group;
use crate::json::deserialize;
use crate::op::OpExecutor;
use crate::user::User;
use crate::vault::Vault;

/// Operations on entities of kind `E`
pub struct Entities<'a, E, X: OpExecutor> {
    client: &'a OnePassword<X>,
    _kind: PhantomData<E>,
}

impl<'a, E: Entity, X: OpExecutor> Entities<'a, E, X> {
    pub(crate) fn new(client: &'a OnePassword<X>) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    fn run<I>(&self, subcommand: Subcommand, arguments: I) -> Result<String>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let mut all = vec![Some(subcommand.to_string())];
        all.extend(arguments);
        self.client.execute(&all)
    }

    fn singular() -> Option<String> {
        Some(E::KIND.singular().to_string())
    }

    fn plural() -> Option<String> {
        Some(E::KIND.plural().to_string())
    }

    fn list_with(&self, filter: Option<String>) -> Result<Vec<E>> {
        let json = self.run(Subcommand::List, [Self::plural(), filter])?;
        deserialize_list(&json)
    }

    /// Get an entity by name or id.
    ///
    /// Fails with [`Error::NotFound`] when nothing matches and with
    /// [`Error::Ambiguous`] when a name matches several entities.
    pub fn get(&self, name_or_id: &str) -> Result<E> {
        self.find(name_or_id)?.ok_or_else(|| {
            Error::NotFound(format!(
                "\"{}\" doesn't seem to be a {}",
                name_or_id,
                E::KIND.singular()
            ))
        })
    }

    /// Get an entity by name or id, `None` if nothing matches
    pub fn find(&self, name_or_id: &str) -> Result<Option<E>> {
        let json = match self.run(
            Subcommand::Get,
            [Self::singular(), Some(name_or_id.to_string())],
        ) {
            Ok(json) => json,
            Err(e) => {
                return match e.classify_lookup() {
                    Error::NotFound(_) => Ok(None),
                    other => Err(other),
                }
            }
        };

        if json.trim().is_empty() {
            return Ok(None);
        }
        deserialize(&json).map(Some)
    }

    /// List all entities of this kind
    pub fn list(&self) -> Result<Vec<E>> {
        self.list_with(None)
    }

    /// List entities, restricted to those related to `filter` when given
    pub fn list_filtered<F: Entity>(&self, filter: Option<&F>) -> Result<Vec<E>> {
        self.list_with(entity_filter(filter))
    }

    /// Write the editable fields of `entity` back
    pub fn edit(&self, entity: &E) -> Result<()> {
        let mut arguments = vec![Self::singular(), Some(entity.id().to_string())];
        arguments.extend(entity.edit_arguments());
        self.run(Subcommand::Edit, arguments)?;
        Ok(())
    }

    pub fn delete(&self, entity: &E) -> Result<()> {
        self.run(
            Subcommand::Delete,
            [Self::singular(), Some(entity.id().to_string())],
        )?;
        Ok(())
    }

    /// Entities of this kind that were granted access to `accessible`
    pub fn list_granted_access_to<A>(&self, accessible: &A) -> Result<Vec<E>>
    where
        A: Accessible,
        E: AccessTo<A>,
    {
        self.list_filtered(Some(accessible))
    }

    /// Entities of this kind granted access to `accessible`, with their roles
    pub fn list_granted_roles_to<A>(&self, accessible: &A) -> Result<Vec<Membership<E>>>
    where
        A: Accessible,
        E: AccessTo<A>,
    {
        let json = self.run(
            Subcommand::List,
            [Self::plural(), entity_filter(Some(accessible))],
        )?;
        deserialize_list(&json)
    }

    /// Entities of this kind that `accessor` has access to
    pub fn list_accessible_by<A>(&self, accessor: &A) -> Result<Vec<E>>
    where
        A: AccessTo<E>,
        E: Accessible,
    {
        self.list_filtered(Some(accessor))
    }
}

impl<'a, E: Accessor, X: OpExecutor> Entities<'a, E, X> {
    /// Grant `accessor` access to `accessible`.
    ///
    /// Without a role the tool's default role applies.
    pub fn grant_access_to<A>(&self, accessor: &E, accessible: &A, role: Option<Role>) -> Result<()>
    where
        A: Accessible,
        E: AccessTo<A>,
    {
        self.run(
            Subcommand::Add,
            [
                Self::singular(),
                Some(accessor.id().to_string()),
                Some(accessible.id().to_string()),
                Flag::Role.is(role.map(|r| r.as_str())),
            ],
        )?;
        Ok(())
    }

    /// Revoke access of `accessor` to `accessible`
    pub fn revoke_access_to<A>(&self, accessor: &E, accessible: &A) -> Result<()>
    where
        A: Accessible,
        E: AccessTo<A>,
    {
        self.run(
            Subcommand::Remove,
            [
                Self::singular(),
                Some(accessor.id().to_string()),
                Some(accessible.id().to_string()),
            ],
        )?;
        Ok(())
    }
}

impl<'a, X: OpExecutor> Entities<'a, User, X> {
    /// Invite a new user
    pub fn create(&self, email: &str, name: &str, language: Option<&str>) -> Result<User> {
        let json = self.run(
            Subcommand::Create,
            [
                Self::singular(),
                Some(email.to_string()),
                Some(name.to_string()),
                Flag::Language.is(language),
            ],
        )?;
        deserialize(&json)
    }

    /// Confirm a user who set up the account
    pub fn confirm(&self, user: &User) -> Result<()> {
        self.client.execute(&[
            Some(Subcommand::Confirm.to_string()),
            Some(user.id().to_string()),
        ])?;
        Ok(())
    }

    /// Confirm all users pending confirmation
    pub fn confirm_all(&self) -> Result<()> {
        self.client.execute(&[
            Some(Subcommand::Confirm.to_string()),
            Some(Flag::All.to_string()),
        ])?;
        Ok(())
    }

    pub fn suspend(&self, user: &User) -> Result<()> {
        self.client.execute(&[
            Some(Subcommand::Suspend.to_string()),
            Some(user.id().to_string()),
        ])?;
        Ok(())
    }

    pub fn reactivate(&self, user: &User) -> Result<()> {
        self.client.execute(&[
            Some(Subcommand::Reactivate.to_string()),
            Some(user.id().to_string()),
        ])?;
        Ok(())
    }
}

impl<'a, X: OpExecutor> Entities<'a, Group, X> {
    pub fn create(&self, name: &str, description: Option<&str>) -> Result<Group> {
        let json = self.run(
            Subcommand::Create,
            [
                Self::singular(),
                Some(name.to_string()),
                Flag::Description.is(description),
            ],
        )?;
        deserialize(&json)
    }
}

impl<'a, X: OpExecutor> Entities<'a, Vault, X> {
    /// Create a vault.
    ///
    /// `allow_admins_to_manage` set to `Some(false)` keeps administrators
    /// from managing the vault; `None` leaves the tool's default.
    pub fn create(
        &self,
        name: &str,
        description: Option<&str>,
        allow_admins_to_manage: Option<bool>,
    ) -> Result<Vault> {
        let json = self.run(
            Subcommand::Create,
            [
                Self::singular(),
                Some(name.to_string()),
                Flag::Description.is(description),
                Flag::AllowAdminsToManage.is(allow_admins_to_manage.map(|b| b.to_string())),
            ],
        )?;
        deserialize(&json)
    }
}

/// Quiet rejections produce no output, which reads as an empty list
fn deserialize_list<T: serde::de::DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    deserialize(json)
}
