//! Firewall convergence policy.

use async_trait::async_trait;

use super::{ConnectionDetails, Kind};
use crate::compare::labels_up_to_date;
use crate::hcloud::{ApiResult, CloudApi, FirewallCreateRequest, UpdateRequest, types};
use crate::resource::{Firewall, Managed, ManagedResource, ResourceKind};
use crate::translate::{self, TranslationError};

pub struct FirewallKind;

#[async_trait]
impl Kind for FirewallKind {
    type Resource = Firewall;
    type External = types::Firewall;
    type CreateRequest = FirewallCreateRequest;

    const KIND: ResourceKind = ResourceKind::Firewall;

    fn resource<'a>(&self, mr: &'a mut ManagedResource) -> Option<&'a mut Firewall> {
        match mr {
            ManagedResource::Firewall(firewall) => Some(firewall),
            _ => None,
        }
    }

    async fn get_by_name(
        &self,
        api: &dyn CloudApi,
        name: &str,
    ) -> ApiResult<Option<types::Firewall>> {
        api.get_firewall_by_name(name).await
    }

    fn external_id(&self, external: &types::Firewall) -> i64 {
        external.id
    }

    fn record(&self, res: &mut Firewall, external: &types::Firewall) -> ConnectionDetails {
        let at = &mut res.status.at_provider;
        at.id = external.id;
        at.created = Some(external.created);
        at.labels = external.labels.clone();
        ConnectionDetails::new()
    }

    fn up_to_date(&self, res: &Firewall, external: &types::Firewall) -> bool {
        labels_up_to_date(res.spec.for_provider.labels.as_ref(), &external.labels)
    }

    fn create_request(&self, res: &Firewall) -> Result<FirewallCreateRequest, TranslationError> {
        translate::firewall::create_request(res.meta().external_name(), &res.spec.for_provider)
    }

    async fn create(
        &self,
        api: &dyn CloudApi,
        req: &FirewallCreateRequest,
    ) -> ApiResult<ConnectionDetails> {
        api.create_firewall(req).await?;
        Ok(ConnectionDetails::new())
    }

    async fn update(&self, api: &dyn CloudApi, id: i64, req: &UpdateRequest) -> ApiResult<()> {
        api.update_firewall(id, req).await?;
        Ok(())
    }

    async fn delete(&self, api: &dyn CloudApi, id: i64) -> ApiResult<()> {
        api.delete_firewall(id).await
    }
}
