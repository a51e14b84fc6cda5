//! Hetzner Cloud API access.
//!
//! [`CloudApi`] is the seam between the convergence layer and the provider.
//! [`HcloudClient`] implements it over HTTPS; tests substitute fakes.

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

pub use client::HcloudClient;
pub use error::ApiError;
pub use types::{
    Firewall, FirewallCreateRequest, PlacementGroup, PlacementGroupCreateRequest, Server,
    ServerCreateRequest, ServerCreateResponse, SshKey, SshKeyCreateRequest, UpdateRequest,
};

/// Result type for provider API calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Provider API operations used by the convergence layer.
///
/// Lookups by name return `Ok(None)` when nothing matches. Implementations
/// must be safe to share across concurrent reconciles of different objects.
#[async_trait]
pub trait CloudApi: Send + Sync {
    async fn get_server_by_name(&self, name: &str) -> ApiResult<Option<Server>>;
    async fn create_server(&self, req: &ServerCreateRequest) -> ApiResult<ServerCreateResponse>;
    async fn update_server(&self, id: i64, req: &UpdateRequest) -> ApiResult<Server>;
    async fn delete_server(&self, id: i64) -> ApiResult<()>;

    async fn get_firewall_by_name(&self, name: &str) -> ApiResult<Option<Firewall>>;
    async fn create_firewall(&self, req: &FirewallCreateRequest) -> ApiResult<Firewall>;
    async fn update_firewall(&self, id: i64, req: &UpdateRequest) -> ApiResult<Firewall>;
    async fn delete_firewall(&self, id: i64) -> ApiResult<()>;

    async fn get_placement_group_by_name(&self, name: &str) -> ApiResult<Option<PlacementGroup>>;
    async fn create_placement_group(
        &self,
        req: &PlacementGroupCreateRequest,
    ) -> ApiResult<PlacementGroup>;
    async fn update_placement_group(
        &self,
        id: i64,
        req: &UpdateRequest,
    ) -> ApiResult<PlacementGroup>;
    async fn delete_placement_group(&self, id: i64) -> ApiResult<()>;

    async fn get_ssh_key_by_name(&self, name: &str) -> ApiResult<Option<SshKey>>;
    async fn create_ssh_key(&self, req: &SshKeyCreateRequest) -> ApiResult<SshKey>;
    async fn update_ssh_key(&self, id: i64, req: &UpdateRequest) -> ApiResult<SshKey>;
    async fn delete_ssh_key(&self, id: i64) -> ApiResult<()>;
}
