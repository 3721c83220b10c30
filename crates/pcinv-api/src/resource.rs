//! Resource collections exposed by Prism Central

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One named collection of Prism Central data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Virtual machines
    Vms,
    /// Clusters
    Clusters,
    /// Projects
    Projects,
    /// Categories
    Categories,
    /// Hypervisor hosts, listed by the `hosts/list` endpoint
    Nodes,
}

impl Resource {
    /// Every resource, in fetch order
    pub const ALL: [Resource; 5] = [
        Resource::Vms,
        Resource::Clusters,
        Resource::Projects,
        Resource::Categories,
        Resource::Nodes,
    ];

    /// Key used in output documents and the cache snapshot
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Resource::Vms => "vms",
            Resource::Clusters => "clusters",
            Resource::Projects => "projects",
            Resource::Categories => "categories",
            Resource::Nodes => "nodes",
        }
    }

    /// Path of the list endpoint, relative to the v3 API root
    #[must_use]
    pub fn list_path(self) -> &'static str {
        match self {
            Resource::Vms => "vms/list",
            Resource::Clusters => "clusters/list",
            Resource::Projects => "projects/list",
            Resource::Categories => "categories/list",
            Resource::Nodes => "hosts/list",
        }
    }

    /// Page length requested by the list call, `None` when no paging body is sent
    #[must_use]
    pub fn page_length(self) -> Option<u32> {
        match self {
            Resource::Vms | Resource::Nodes => Some(15000),
            Resource::Clusters | Resource::Projects => Some(1000),
            Resource::Categories => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown resource name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown resource: {0}")]
pub struct ParseResourceError(pub String);

impl FromStr for Resource {
    type Err = ParseResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| ParseResourceError(s.to_string()))
    }
}
