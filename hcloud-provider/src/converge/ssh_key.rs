//! SSH key convergence policy.

use async_trait::async_trait;

use super::{ConnectionDetails, Kind};
use crate::compare::labels_up_to_date;
use crate::hcloud::{ApiResult, CloudApi, SshKeyCreateRequest, UpdateRequest, types};
use crate::resource::{Managed, ManagedResource, ResourceKind, SshKey};
use crate::translate::TranslationError;

pub struct SshKeyKind;

#[async_trait]
impl Kind for SshKeyKind {
    type Resource = SshKey;
    type External = types::SshKey;
    type CreateRequest = SshKeyCreateRequest;

    const KIND: ResourceKind = ResourceKind::SshKey;

    fn resource<'a>(&self, mr: &'a mut ManagedResource) -> Option<&'a mut SshKey> {
        match mr {
            ManagedResource::SshKey(key) => Some(key),
            _ => None,
        }
    }

    async fn get_by_name(&self, api: &dyn CloudApi, name: &str) -> ApiResult<Option<types::SshKey>> {
        api.get_ssh_key_by_name(name).await
    }

    fn external_id(&self, external: &types::SshKey) -> i64 {
        external.id
    }

    fn record(&self, res: &mut SshKey, external: &types::SshKey) -> ConnectionDetails {
        let at = &mut res.status.at_provider;
        at.id = external.id;
        at.created = Some(external.created);
        at.fingerprint = external.fingerprint.clone();
        at.labels = external.labels.clone();
        ConnectionDetails::new()
    }

    fn up_to_date(&self, res: &SshKey, external: &types::SshKey) -> bool {
        labels_up_to_date(res.spec.for_provider.labels.as_ref(), &external.labels)
    }

    fn create_request(&self, res: &SshKey) -> Result<SshKeyCreateRequest, TranslationError> {
        Ok(SshKeyCreateRequest {
            name: res.meta().external_name().to_string(),
            public_key: res.spec.for_provider.public_key.clone(),
            labels: res.spec.for_provider.labels.clone(),
        })
    }

    async fn create(
        &self,
        api: &dyn CloudApi,
        req: &SshKeyCreateRequest,
    ) -> ApiResult<ConnectionDetails> {
        api.create_ssh_key(req).await?;
        Ok(ConnectionDetails::new())
    }

    /// SSH keys re-send their external name along with the labels.
    fn update_request(&self, res: &SshKey) -> UpdateRequest {
        UpdateRequest {
            name: Some(res.meta().external_name().to_string()),
            labels: Some(res.spec.for_provider.labels.clone().unwrap_or_default()),
        }
    }

    async fn update(&self, api: &dyn CloudApi, id: i64, req: &UpdateRequest) -> ApiResult<()> {
        api.update_ssh_key(id, req).await?;
        Ok(())
    }

    async fn delete(&self, api: &dyn CloudApi, id: i64) -> ApiResult<()> {
        api.delete_ssh_key(id).await
    }
}
