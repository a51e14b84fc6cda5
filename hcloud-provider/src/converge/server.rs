//! Server convergence policy.

use async_trait::async_trait;

use super::{ConnectionDetails, Kind};
use crate::compare::labels_up_to_date;
use crate::hcloud::{ApiResult, CloudApi, ServerCreateRequest, UpdateRequest, types};
use crate::resource::{Managed, ManagedResource, ResourceKind, Server};
use crate::translate::{self, TranslationError};

/// Connection detail key for the generated root password.
pub const ROOT_PASSWORD_KEY: &str = "root_password";
pub const IPV4_KEY: &str = "ipv4";
pub const IPV6_KEY: &str = "ipv6";

pub struct ServerKind;

#[async_trait]
impl Kind for ServerKind {
    type Resource = Server;
    type External = types::Server;
    type CreateRequest = ServerCreateRequest;

    const KIND: ResourceKind = ResourceKind::Server;

    fn resource<'a>(&self, mr: &'a mut ManagedResource) -> Option<&'a mut Server> {
        match mr {
            ManagedResource::Server(server) => Some(server),
            _ => None,
        }
    }

    async fn get_by_name(&self, api: &dyn CloudApi, name: &str) -> ApiResult<Option<types::Server>> {
        api.get_server_by_name(name).await
    }

    fn external_id(&self, external: &types::Server) -> i64 {
        external.id
    }

    fn record(&self, res: &mut Server, external: &types::Server) -> ConnectionDetails {
        let at = &mut res.status.at_provider;
        at.id = external.id;
        at.created = Some(external.created);
        at.status = external.status.clone();
        at.labels = external.labels.clone();

        let net = &external.public_net;
        at.ipv4 = net.ipv4.as_ref().map(|v4| v4.ip.clone()).unwrap_or_default();
        at.dns = net
            .ipv4
            .as_ref()
            .map(|v4| v4.dns_ptr.clone())
            .unwrap_or_default();
        at.ipv6 = net.ipv6.as_ref().map(|v6| v6.ip.clone()).unwrap_or_default();

        let mut details = ConnectionDetails::new();
        if !at.ipv4.is_empty() {
            details.insert(IPV4_KEY.to_string(), at.ipv4.clone().into_bytes());
        }
        if !at.ipv6.is_empty() {
            details.insert(IPV6_KEY.to_string(), at.ipv6.clone().into_bytes());
        }
        details
    }

    fn up_to_date(&self, res: &Server, external: &types::Server) -> bool {
        labels_up_to_date(res.spec.for_provider.labels.as_ref(), &external.labels)
    }

    fn create_request(&self, res: &Server) -> Result<ServerCreateRequest, TranslationError> {
        Ok(translate::server::create_request(
            res.meta().external_name(),
            &res.spec.for_provider,
        ))
    }

    async fn create(
        &self,
        api: &dyn CloudApi,
        req: &ServerCreateRequest,
    ) -> ApiResult<ConnectionDetails> {
        let created = api.create_server(req).await?;

        let mut details = ConnectionDetails::new();
        if let Some(password) = created.root_password {
            details.insert(ROOT_PASSWORD_KEY.to_string(), password.into_bytes());
        }
        Ok(details)
    }

    async fn update(&self, api: &dyn CloudApi, id: i64, req: &UpdateRequest) -> ApiResult<()> {
        api.update_server(id, req).await?;
        Ok(())
    }

    async fn delete(&self, api: &dyn CloudApi, id: i64) -> ApiResult<()> {
        api.delete_server(id).await
    }
}
