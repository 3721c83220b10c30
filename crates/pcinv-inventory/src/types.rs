//! Inventory document types

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Group holding every host
pub const ALL_GROUP: &str = "all";

/// Reserved key carrying per-host variables
pub const META_KEY: &str = "_meta";

/// A named bucket of host addresses
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, Deserialize)]
pub struct Group {
    pub hosts: Vec<String>,
    pub vars: Map<String, Value>,
}

impl Group {
    #[must_use]
    pub fn with_vars(vars: Map<String, Value>) -> Self {
        Self {
            hosts: Vec::new(),
            vars,
        }
    }

    /// Add a host unless it is already a member
    pub fn add_host(&mut self, host: &str) {
        if !self.hosts.iter().any(|h| h == host) {
            self.hosts.push(host.to_string());
        }
    }

    #[must_use]
    pub fn contains(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| h == host)
    }
}

/// Ansible dynamic inventory
///
/// Serializes as `{"all": .., "_meta": {"hostvars": ..}, "<group>": ..}`
/// with groups in creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    all: Group,
    hostvars: IndexMap<String, Value>,
    groups: IndexMap<String, Group>,
}

impl Inventory {
    /// Empty inventory whose `all` group carries `group_variables`
    #[must_use]
    pub fn new(group_variables: Map<String, Value>) -> Self {
        Self {
            all: Group::with_vars(group_variables),
            hostvars: IndexMap::new(),
            groups: IndexMap::new(),
        }
    }

    /// Register a host: append it to `all` and record its variables
    pub fn add_hostvars(&mut self, host: &str, vars: Value) {
        self.all.hosts.push(host.to_string());
        self.hostvars.insert(host.to_string(), vars);
    }

    /// Add a host to a group, creating the group on first use
    pub fn add_host(&mut self, group: &str, host: &str) {
        match group {
            ALL_GROUP => self.all.add_host(host),
            META_KEY => warn!(host, "group name collides with _meta, skipped"),
            _ => self.groups.entry(group.to_string()).or_default().add_host(host),
        }
    }

    #[must_use]
    pub fn all(&self) -> &Group {
        &self.all
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        if name == ALL_GROUP {
            return Some(&self.all);
        }
        self.groups.get(name)
    }

    /// Names of the derived groups, in creation order
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    #[must_use]
    pub fn hostvars(&self, host: &str) -> Option<&Value> {
        self.hostvars.get(host)
    }

    #[must_use]
    pub fn host_count(&self) -> usize {
        self.hostvars.len()
    }

    /// JSON document form
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(Map::new())
    }
}

impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct Meta<'a> {
            hostvars: &'a IndexMap<String, Value>,
        }

        let mut map = serializer.serialize_map(Some(self.groups.len() + 2))?;
        map.serialize_entry(ALL_GROUP, &self.all)?;
        map.serialize_entry(
            META_KEY,
            &Meta {
                hostvars: &self.hostvars,
            },
        )?;
        for (name, group) in &self.groups {
            map.serialize_entry(name, group)?;
        }
        map.end()
    }
}
