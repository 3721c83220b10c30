//! HTTP client for the Prism Central v3 API

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use pcinv_api::{
    ApiResponse, Resource,
    requests::{ListRequest, SearchRequest},
};

use crate::error::{ClientError, Result};
use crate::traits::PrismApi;

/// Port the Prism Central API listens on
pub const API_PORT: u16 = 9440;

/// API namespace in the request path
pub const API_NAMESPACE: &str = "nutanix";

/// Upper bound for every request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
struct Credentials {
    username: String,
    password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// HTTP client for one Prism Central appliance
#[derive(Debug, Clone)]
pub struct PrismClient {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

impl PrismClient {
    /// Create a client for the appliance at `ip_addr`
    ///
    /// Certificate verification is disabled: the appliance serves a
    /// self-signed certificate.
    ///
    /// # Errors
    /// Returns an error if the TLS backend cannot be initialised or the
    /// address does not form a valid URL.
    pub fn new(
        ip_addr: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = format!("https://{ip_addr}:{API_PORT}/api/{API_NAMESPACE}/v3/");
        Self::with_client(base_url, client, username, password)
    }

    /// Create a client with a custom `reqwest::Client` and API root
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn with_client(
        base_url: impl AsRef<str>,
        client: Client,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client,
            base_url,
            credentials: Credentials {
                username: username.into(),
                password: password.into(),
            },
        })
    }

    /// Build a full URL from a path relative to the v3 root
    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(ClientError::Url)
    }

    /// URL of one VM; the uuid is escaped as a single path segment
    fn vm_url(&self, uuid: &str) -> Result<Url> {
        let mut url = self.url("vms")?;
        url.path_segments_mut()
            .map_err(|()| ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(uuid);
        Ok(url)
    }

    /// Perform one authenticated request and decode the JSON body
    async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Value> {
        let mut request = self.client.request(method, url).basic_auth(
            &self.credentials.username,
            Some(&self.credentials.password),
        );
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ClientError::from_transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ClientError::from_transport)?;

        if !status.is_success() {
            let payload = if bytes.is_empty() {
                None
            } else {
                serde_json::from_slice(&bytes).ok()
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                payload,
            });
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Perform a request and fold any failure into the sentinel response
    async fn rest_call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Result<Url>,
        body: Option<&B>,
    ) -> ApiResponse {
        let path = url
            .as_ref()
            .map(|url| url.path().to_string())
            .unwrap_or_default();
        let result = match url {
            Ok(url) => self.call(method, url, body).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(value) => {
                debug!(path = %path, "request succeeded");
                ApiResponse::Success(value)
            }
            Err(e) => {
                warn!(path = %path, error = %e, "request failed");
                ApiResponse::error(e.into_payload())
            }
        }
    }
}

#[async_trait]
impl PrismApi for PrismClient {
    #[instrument(skip(self), fields(resource = %resource))]
    async fn list(&self, resource: Resource) -> ApiResponse {
        match resource.page_length() {
            Some(length) => {
                let body = ListRequest::first_page(length);
                let url = self.url(resource.list_path());
                self.rest_call(Method::POST, url, Some(&body)).await
            }
            None => {
                let body = serde_json::json!({});
                let url = self.url(resource.list_path());
                self.rest_call(Method::POST, url, Some(&body)).await
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_vm(&self, uuid: &str) -> ApiResponse {
        self.rest_call::<Value>(Method::GET, self.vm_url(uuid), None)
            .await
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> ApiResponse {
        let body = SearchRequest::autocomplete(query);
        self.rest_call(Method::POST, self.url("search"), Some(&body))
            .await
    }
}
