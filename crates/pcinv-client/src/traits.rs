//! API trait used by the resource loader and host lookup

use async_trait::async_trait;
use pcinv_api::{ApiResponse, Resource};

/// Operations the inventory needs from Prism Central
///
/// Implemented by [`PrismClient`](crate::PrismClient); tests substitute a mock.
#[async_trait]
pub trait PrismApi: Send + Sync {
    /// List one resource collection
    async fn list(&self, resource: Resource) -> ApiResponse;

    /// Fetch one VM by UUID
    async fn get_vm(&self, uuid: &str) -> ApiResponse;

    /// Free-text autocompletion search
    async fn search(&self, query: &str) -> ApiResponse;

    async fn list_vms(&self) -> ApiResponse {
        self.list(Resource::Vms).await
    }

    async fn list_clusters(&self) -> ApiResponse {
        self.list(Resource::Clusters).await
    }

    async fn list_projects(&self) -> ApiResponse {
        self.list(Resource::Projects).await
    }

    async fn list_categories(&self) -> ApiResponse {
        self.list(Resource::Categories).await
    }

    async fn list_nodes(&self) -> ApiResponse {
        self.list(Resource::Nodes).await
    }
}
