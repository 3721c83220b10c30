//! Resolve one host name to its VM document

use serde_json::{Value, json};
use tracing::{info, instrument};

use pcinv_api::{ApiResponse, responses::SearchResponse};
use pcinv_client::PrismApi;

use crate::error::CoreError;

/// Search for `host`, then fetch the first match by UUID
///
/// Always hits the API. Returns `{"vm": <document>}`; a failed VM fetch is
/// carried as the sentinel inside that document.
///
/// # Errors
/// `Lookup` if the search call fails or its body has an unexpected shape,
/// `HostNotFound` if it matched nothing.
#[instrument(skip(api))]
pub async fn lookup_host<A: PrismApi + ?Sized>(api: &A, host: &str) -> Result<Value, CoreError> {
    let lookup_error = |reason: String| CoreError::Lookup {
        host: host.to_string(),
        reason,
    };

    let body = match api.search(host).await {
        ApiResponse::Success(body) => body,
        ApiResponse::Error { code, payload } => {
            let detail = payload.map(|p| format!(": {p}")).unwrap_or_default();
            return Err(lookup_error(format!("search failed with code {code}{detail}")));
        }
    };

    let search: SearchResponse =
        serde_json::from_value(body).map_err(|e| lookup_error(e.to_string()))?;
    let uuid = search
        .first_identifier()
        .ok_or_else(|| CoreError::HostNotFound(host.to_string()))?;

    info!(uuid, "host resolved");
    let vm = api.get_vm(uuid).await.into_value();
    Ok(json!({ "vm": vm }))
}
