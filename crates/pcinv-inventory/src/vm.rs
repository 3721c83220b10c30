//! Typed view over a v3 VM document
//!
//! Only the fields the inventory reads are modelled; the full document is
//! kept untouched as host variables.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::InventoryError;

#[derive(Debug, Clone, Deserialize)]
pub struct VmView {
    pub metadata: VmMetadata,
    pub status: VmStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VmMetadata {
    pub uuid: String,
    pub project_reference: Option<Reference>,
    pub owner_reference: Option<Reference>,
    #[serde(default)]
    pub categories: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VmStatus {
    pub name: String,
    pub cluster_reference: Option<Reference>,
    #[serde(default)]
    pub resources: VmResources,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VmResources {
    #[serde(default)]
    pub nic_list: Vec<Nic>,
    pub hypervisor_type: Option<String>,
    pub power_state: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Nic {
    pub ip_endpoint_list: Option<Vec<IpEndpoint>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IpEndpoint {
    pub ip: String,
}

/// `{kind, uuid, name}` pointer to another entity
#[derive(Debug, Clone, Deserialize)]
pub struct Reference {
    pub name: Option<String>,
}

impl VmView {
    /// Decode the narrow view from a raw VM document
    ///
    /// # Errors
    /// Returns `MalformedVm` if the UUID or name is missing.
    pub fn from_document(doc: &Value) -> Result<Self, InventoryError> {
        Self::deserialize(doc).map_err(|e| InventoryError::MalformedVm(e.to_string()))
    }

    /// First address of the first interface that has one
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.status
            .resources
            .nic_list
            .iter()
            .filter_map(|nic| nic.ip_endpoint_list.as_deref())
            .find_map(|endpoints| endpoints.first())
            .map(|endpoint| endpoint.ip.as_str())
    }

    #[must_use]
    pub fn cluster_name(&self) -> Option<&str> {
        reference_name(self.status.cluster_reference.as_ref())
    }

    #[must_use]
    pub fn project_name(&self) -> Option<&str> {
        reference_name(self.metadata.project_reference.as_ref())
    }

    #[must_use]
    pub fn owner_name(&self) -> Option<&str> {
        reference_name(self.metadata.owner_reference.as_ref())
    }

    /// Category key/value pairs, values rendered as text
    pub fn categories(&self) -> impl Iterator<Item = (&str, String)> {
        self.metadata.categories.iter().map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.as_str(), value)
        })
    }
}

fn reference_name(reference: Option<&Reference>) -> Option<&str> {
    reference.and_then(|r| r.name.as_deref())
}
