use serde::{Deserialize, Serialize};
use crate::models::wire::{de_id, ser_id};

/// Entry of a backend-owned enumeration (stage status, stage type)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    #[serde(deserialize_with = "de_id", serialize_with = "ser_id")]
    pub id: String,
    #[serde(default, alias = "libelle", deserialize_with = "crate::models::wire::null_default")]
    pub description: String,
}

/// Find the description for an id, if the enumeration knows it
pub fn label_of<'a>(items: &'a [ReferenceItem], id: &str) -> Option<&'a str> {
    items
        .iter()
        .find(|item| item.id == id)
        .map(|item| item.description.as_str())
}
