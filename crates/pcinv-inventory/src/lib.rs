//! pcinv-inventory: Ansible inventory from Prism Central VMs
//!
//! Turns a `vms/list` payload into groups of host addresses keyed by UUID,
//! name, cluster, project, owner, hypervisor, power state and category.

pub mod builder;
pub mod error;
pub mod safe;
pub mod types;
pub mod vm;

pub use builder::InventoryBuilder;
pub use error::InventoryError;
pub use safe::to_safe;
pub use types::{Group, Inventory};
pub use vm::VmView;
