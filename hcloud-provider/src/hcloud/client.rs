//! HTTP client for the Hetzner Cloud v1 API.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::types::{
    Firewall, FirewallCreateRequest, PlacementGroup, PlacementGroupCreateRequest, Server,
    ServerCreateRequest, ServerCreateResponse, SshKey, SshKeyCreateRequest, UpdateRequest,
};
use super::{ApiError, ApiResult, CloudApi};
use crate::config::ClientConfig;

const SERVERS: &str = "servers";
const FIREWALLS: &str = "firewalls";
const PLACEMENT_GROUPS: &str = "placement_groups";
const SSH_KEYS: &str = "ssh_keys";

/// Authenticated Hetzner Cloud API client.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct HcloudClient {
    http: reqwest::Client,
    config: ClientConfig,
    token: String,
}

impl HcloudClient {
    pub fn new(token: impl Into<String>, config: ClientConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            config,
            token: token.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "Provider API request");
        self.http
            .request(method, self.config.url(path))
            .bearer_auth(&self.token)
    }

    /// Send a request and return the body of a successful response.
    async fn execute(&self, builder: RequestBuilder) -> ApiResult<Vec<u8>> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        Ok(body.to_vec())
    }

    async fn get_by_name<T: DeserializeOwned>(
        &self,
        collection: &str,
        name: &str,
    ) -> ApiResult<Option<T>> {
        let body = self
            .execute(
                self.request(Method::GET, collection)
                    .query(&[("name", name)]),
            )
            .await?;
        let items: Vec<T> = field(&body, collection)?;
        Ok(items.into_iter().next())
    }

    async fn post<B: Serialize + ?Sized>(&self, collection: &str, req: &B) -> ApiResult<Vec<u8>> {
        self.execute(self.request(Method::POST, collection).json(req))
            .await
    }

    async fn put<B: Serialize + ?Sized>(
        &self,
        collection: &str,
        id: i64,
        req: &B,
    ) -> ApiResult<Vec<u8>> {
        self.execute(
            self.request(Method::PUT, &format!("{collection}/{id}"))
                .json(req),
        )
        .await
    }

    async fn delete(&self, collection: &str, id: i64) -> ApiResult<()> {
        self.execute(self.request(Method::DELETE, &format!("{collection}/{id}")))
            .await?;
        Ok(())
    }
}

/// Decode one top-level field of a JSON response, e.g. `firewall` or `ssh_keys`.
fn field<T: DeserializeOwned>(body: &[u8], key: &str) -> ApiResult<T> {
    let mut value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    let inner = value
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ApiError::Decode(format!("response has no `{key}` field")))?;
    serde_json::from_value(inner).map_err(|e| ApiError::Decode(format!("{key}: {e}")))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl CloudApi for HcloudClient {
    async fn get_server_by_name(&self, name: &str) -> ApiResult<Option<Server>> {
        self.get_by_name(SERVERS, name).await
    }

    async fn create_server(&self, req: &ServerCreateRequest) -> ApiResult<ServerCreateResponse> {
        let body = self.post(SERVERS, req).await?;
        decode(&body)
    }

    async fn update_server(&self, id: i64, req: &UpdateRequest) -> ApiResult<Server> {
        let body = self.put(SERVERS, id, req).await?;
        field(&body, "server")
    }

    async fn delete_server(&self, id: i64) -> ApiResult<()> {
        self.delete(SERVERS, id).await
    }

    async fn get_firewall_by_name(&self, name: &str) -> ApiResult<Option<Firewall>> {
        self.get_by_name(FIREWALLS, name).await
    }

    async fn create_firewall(&self, req: &FirewallCreateRequest) -> ApiResult<Firewall> {
        let body = self.post(FIREWALLS, req).await?;
        field(&body, "firewall")
    }

    async fn update_firewall(&self, id: i64, req: &UpdateRequest) -> ApiResult<Firewall> {
        let body = self.put(FIREWALLS, id, req).await?;
        field(&body, "firewall")
    }

    async fn delete_firewall(&self, id: i64) -> ApiResult<()> {
        self.delete(FIREWALLS, id).await
    }

    async fn get_placement_group_by_name(&self, name: &str) -> ApiResult<Option<PlacementGroup>> {
        self.get_by_name(PLACEMENT_GROUPS, name).await
    }

    async fn create_placement_group(
        &self,
        req: &PlacementGroupCreateRequest,
    ) -> ApiResult<PlacementGroup> {
        let body = self.post(PLACEMENT_GROUPS, req).await?;
        field(&body, "placement_group")
    }

    async fn update_placement_group(
        &self,
        id: i64,
        req: &UpdateRequest,
    ) -> ApiResult<PlacementGroup> {
        let body = self.put(PLACEMENT_GROUPS, id, req).await?;
        field(&body, "placement_group")
    }

    async fn delete_placement_group(&self, id: i64) -> ApiResult<()> {
        self.delete(PLACEMENT_GROUPS, id).await
    }

    async fn get_ssh_key_by_name(&self, name: &str) -> ApiResult<Option<SshKey>> {
        self.get_by_name(SSH_KEYS, name).await
    }

    async fn create_ssh_key(&self, req: &SshKeyCreateRequest) -> ApiResult<SshKey> {
        let body = self.post(SSH_KEYS, req).await?;
        field(&body, "ssh_key")
    }

    async fn update_ssh_key(&self, id: i64, req: &UpdateRequest) -> ApiResult<SshKey> {
        let body = self.put(SSH_KEYS, id, req).await?;
        field(&body, "ssh_key")
    }

    async fn delete_ssh_key(&self, id: i64) -> ApiResult<()> {
        self.delete(SSH_KEYS, id).await
    }
}
