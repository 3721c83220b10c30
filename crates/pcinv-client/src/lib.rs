//! pcinv-client: Prism Central v3 REST client
//!
//! Every call goes to `https://{ip}:9440/api/nutanix/v3/<path>` with HTTP
//! basic credentials. Failures never propagate as `Err`: they come back as
//! [`ApiResponse::Error`](pcinv_api::ApiResponse::Error) so callers can emit
//! them in place of the data they stand for.
//!
//! # Example
//!
//! ```no_run
//! use pcinv_client::{PrismApi, PrismClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PrismClient::new("10.0.0.10", "admin", "secret")?;
//!
//! let vms = client.list_vms().await;
//! if vms.is_error() {
//!     eprintln!("vms unavailable this run");
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod traits;

pub use error::{ClientError, Result};
pub use http::{API_NAMESPACE, API_PORT, PrismClient, REQUEST_TIMEOUT};
pub use traits::PrismApi;
