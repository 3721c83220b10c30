//! Build an inventory from a `vms/list` payload

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::error::InventoryError;
use crate::safe::to_safe;
use crate::types::Inventory;
use crate::vm::VmView;

/// Group every VM belongs to
pub const PRISM_CENTRAL_GROUP: &str = "prism_central";

/// Inventory builder
///
/// Carries the variables attached to the `all` group.
#[derive(Debug, Clone, Default)]
pub struct InventoryBuilder {
    group_variables: Map<String, Value>,
}

impl InventoryBuilder {
    #[must_use]
    pub fn new(group_variables: Map<String, Value>) -> Self {
        Self { group_variables }
    }

    /// Build the inventory for every entity of a `vms/list` response
    ///
    /// VMs that cannot be placed (malformed, or no assigned address) are
    /// skipped. A payload without an `entities` list, such as a failed call,
    /// yields the empty skeleton.
    #[instrument(skip_all)]
    pub fn build(&self, vms: &Value) -> Inventory {
        let mut inventory = Inventory::new(self.group_variables.clone());

        let Some(entities) = vms.get("entities").and_then(Value::as_array) else {
            warn!("vms payload has no entities list, inventory left empty");
            return inventory;
        };

        for doc in entities {
            match add_vm(&mut inventory, doc) {
                Ok(address) => debug!(address = %address, "vm added"),
                Err(e @ InventoryError::NoAddress { .. }) => debug!(error = %e, "vm skipped"),
                Err(e) => warn!(error = %e, "vm skipped"),
            }
        }

        info!(hosts = inventory.host_count(), "inventory built");
        inventory
    }
}

/// Place one VM in its groups, returning the address used
fn add_vm(inventory: &mut Inventory, doc: &Value) -> Result<String, InventoryError> {
    let vm = VmView::from_document(doc)?;
    let address = vm
        .address()
        .ok_or_else(|| InventoryError::NoAddress {
            uuid: vm.metadata.uuid.clone(),
        })?
        .to_string();

    inventory.add_hostvars(&address, doc.clone());
    inventory.add_host(&vm.metadata.uuid, &address);
    inventory.add_host(&vm.status.name, &address);

    inventory.add_host(PRISM_CENTRAL_GROUP, &address);
    let fixed = [
        ("cluster", vm.cluster_name()),
        ("project", vm.project_name()),
        ("owner", vm.owner_name()),
        ("hypervisor", vm.status.resources.hypervisor_type.as_deref()),
        ("status", vm.status.resources.power_state.as_deref()),
    ];
    for (prefix, value) in fixed {
        match value {
            Some(value) => {
                inventory.add_host(&format!("{prefix}_{}", value.to_lowercase()), &address);
            }
            None => debug!(uuid = %vm.metadata.uuid, prefix, "no value, group omitted"),
        }
    }

    for (key, value) in vm.categories() {
        if key.is_empty() {
            continue;
        }
        let group = format!(
            "category_{}_{}",
            to_safe(key).to_lowercase(),
            to_safe(&value).to_lowercase()
        );
        inventory.add_host(&group, &address);
    }

    Ok(address)
}
