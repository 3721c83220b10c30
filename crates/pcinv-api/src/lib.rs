//! pcinv-api: Shared Prism Central wire types
//!
//! Contains the resource selector, request bodies and the normalized response
//! type used across the client, the core run logic and the CLI.

pub mod requests;
pub mod resource;
pub mod responses;

pub use resource::{ParseResourceError, Resource};
pub use responses::{ApiResponse, SENTINEL_ERROR_CODE};
