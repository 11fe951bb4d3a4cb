//! Vaults holding items

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{Accessible, Entity, EntityKind, Named};
use crate::flags::Flag;

/// A vault
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vault {
    #[serde(rename = "uuid", alias = "id")]
    id: String,
    name: String,
    #[serde(rename = "desc", default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Entity for Vault {
    const KIND: EntityKind = EntityKind::Vault;

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

impl Named for Vault {
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

impl Accessible for Vault {}

impl fmt::Display for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::entity_filter;
    use crate::json::deserialize;

    #[test]
    fn test_deserialize_vault() {
        let vault: Vault =
            deserialize(r#"{"uuid":"V1","name":"Shared","desc":"Team secrets","type":"U"}"#)
                .unwrap();
        assert_eq!(vault.id(), "V1");
        assert_eq!(vault.name(), "Shared");
        assert_eq!(vault.description(), Some("Team secrets"));
    }

    #[test]
    fn test_entity_filter() {
        let vault: Vault = deserialize(r#"{"uuid":"V1","name":"Shared"}"#).unwrap();
        assert_eq!(entity_filter(Some(&vault)), Some("--vault=V1".to_string()));
        assert_eq!(entity_filter::<Vault>(None), None);
    }

    #[test]
    fn test_list_deserialization() {
        let vaults: Vec<Vault> = deserialize(
            r#"[{"uuid":"V1","name":"Private"},{"uuid":"V2","name":"Shared","desc":""}]"#,
        )
        .unwrap();
        assert_eq!(vaults.len(), 2);
        assert_eq!(vaults[1].name(), "Shared");
        assert!(vaults[1].description().is_none());
    }
}
