//! Placement group convergence policy.

use async_trait::async_trait;

use super::{ConnectionDetails, Kind};
use crate::compare::placement_group_labels_up_to_date;
use crate::hcloud::{ApiResult, CloudApi, PlacementGroupCreateRequest, UpdateRequest, types};
use crate::resource::{Managed, ManagedResource, PlacementGroup, ResourceKind};
use crate::translate::TranslationError;

pub struct PlacementGroupKind;

#[async_trait]
impl Kind for PlacementGroupKind {
    type Resource = PlacementGroup;
    type External = types::PlacementGroup;
    type CreateRequest = PlacementGroupCreateRequest;

    const KIND: ResourceKind = ResourceKind::PlacementGroup;

    fn resource<'a>(&self, mr: &'a mut ManagedResource) -> Option<&'a mut PlacementGroup> {
        match mr {
            ManagedResource::PlacementGroup(group) => Some(group),
            _ => None,
        }
    }

    async fn get_by_name(
        &self,
        api: &dyn CloudApi,
        name: &str,
    ) -> ApiResult<Option<types::PlacementGroup>> {
        api.get_placement_group_by_name(name).await
    }

    fn external_id(&self, external: &types::PlacementGroup) -> i64 {
        external.id
    }

    fn record(
        &self,
        res: &mut PlacementGroup,
        external: &types::PlacementGroup,
    ) -> ConnectionDetails {
        let at = &mut res.status.at_provider;
        at.id = external.id;
        at.created = Some(external.created);
        at.labels = external.labels.clone();
        at.servers = external.servers.clone();
        ConnectionDetails::new()
    }

    fn up_to_date(&self, res: &PlacementGroup, external: &types::PlacementGroup) -> bool {
        placement_group_labels_up_to_date(res.spec.for_provider.labels.as_ref(), &external.labels)
    }

    fn create_request(
        &self,
        res: &PlacementGroup,
    ) -> Result<PlacementGroupCreateRequest, TranslationError> {
        Ok(PlacementGroupCreateRequest {
            name: res.meta().external_name().to_string(),
            group_type: res.spec.for_provider.group_type,
            labels: res.spec.for_provider.labels.clone(),
        })
    }

    async fn create(
        &self,
        api: &dyn CloudApi,
        req: &PlacementGroupCreateRequest,
    ) -> ApiResult<ConnectionDetails> {
        api.create_placement_group(req).await?;
        Ok(ConnectionDetails::new())
    }

    async fn update(&self, api: &dyn CloudApi, id: i64, req: &UpdateRequest) -> ApiResult<()> {
        api.update_placement_group(id, req).await?;
        Ok(())
    }

    async fn delete(&self, api: &dyn CloudApi, id: i64) -> ApiResult<()> {
        api.delete_placement_group(id).await
    }
}
