//! Error types for pcinv-inventory

use thiserror::Error;

/// Reasons a VM document contributes nothing to the inventory
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Document lacks a field the inventory needs
    #[error("malformed VM document: {0}")]
    MalformedVm(String),

    /// No interface carries an assigned address
    #[error("VM {uuid} has no assigned address")]
    NoAddress {
        /// VM UUID
        uuid: String,
    },
}
