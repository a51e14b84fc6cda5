//! Convergence clients.
//!
//! Each managed resource kind gets the same four operations: observe, create,
//! update and delete. [`Converger`] implements them once; the per-kind
//! behavior (lookup, status projection, comparison, request building) comes
//! from a [`Kind`] policy object.

pub mod firewall;
pub mod placement_group;
pub mod server;
pub mod ssh_key;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::context::ReconcileContext;
use crate::error::{Error, Result};
use crate::hcloud::{ApiResult, CloudApi, UpdateRequest};
use crate::resource::{Managed, ManagedResource, ResourceKind};
use crate::translate::TranslationError;

pub use firewall::FirewallKind;
pub use placement_group::PlacementGroupKind;
pub use server::ServerKind;
pub use ssh_key::SshKeyKind;

/// Secrets and endpoints to publish for a resource, e.g. a root password.
pub type ConnectionDetails = BTreeMap<String, Vec<u8>>;

/// Result of observing an external resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    pub resource_exists: bool,
    pub resource_up_to_date: bool,
    pub connection_details: ConnectionDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Creation {
    pub connection_details: ConnectionDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalUpdate {
    pub connection_details: ConnectionDetails,
}

/// Observes, then creates, updates or deletes an external resource so it
/// reflects the managed resource's desired state.
///
/// Status is written into the `ManagedResource` in place; persisting it is
/// the caller's job.
#[async_trait]
pub trait ExternalClient: Send + Sync {
    async fn observe(&self, ctx: &ReconcileContext, mr: &mut ManagedResource)
    -> Result<Observation>;

    /// Only valid after `observe` reported that the resource does not exist.
    async fn create(&self, ctx: &ReconcileContext, mr: &mut ManagedResource) -> Result<Creation>;

    /// Only valid after `observe` reported an existing, out-of-date resource.
    async fn update(
        &self,
        ctx: &ReconcileContext,
        mr: &mut ManagedResource,
    ) -> Result<ExternalUpdate>;

    async fn delete(&self, ctx: &ReconcileContext, mr: &mut ManagedResource) -> Result<()>;
}

/// Per-kind capabilities plugged into [`Converger`].
#[async_trait]
pub trait Kind: Send + Sync + 'static {
    /// Managed resource type of this kind.
    type Resource: Managed + Send + Sync;
    /// Provider object as returned by the API.
    type External: Send + Sync;
    /// Provider create request.
    type CreateRequest: Send + Sync;

    const KIND: ResourceKind;

    /// Borrow the resource of this kind out of a managed resource.
    fn resource<'a>(&self, mr: &'a mut ManagedResource) -> Option<&'a mut Self::Resource>;

    async fn get_by_name(&self, api: &dyn CloudApi, name: &str)
    -> ApiResult<Option<Self::External>>;

    fn external_id(&self, external: &Self::External) -> i64;

    /// Copy observed fields into the status projection.
    fn record(&self, res: &mut Self::Resource, external: &Self::External) -> ConnectionDetails;

    fn up_to_date(&self, res: &Self::Resource, external: &Self::External) -> bool;

    fn create_request(
        &self,
        res: &Self::Resource,
    ) -> std::result::Result<Self::CreateRequest, TranslationError>;

    async fn create(
        &self,
        api: &dyn CloudApi,
        req: &Self::CreateRequest,
    ) -> ApiResult<ConnectionDetails>;

    /// Fields sent on update: the full desired label set.
    ///
    /// Unset desired labels are sent as an empty map so the provider side is
    /// cleared, which is what the comparison expects.
    fn update_request(&self, res: &Self::Resource) -> UpdateRequest {
        UpdateRequest {
            name: None,
            labels: Some(res.desired_labels().cloned().unwrap_or_default()),
        }
    }

    async fn update(&self, api: &dyn CloudApi, id: i64, req: &UpdateRequest) -> ApiResult<()>;

    async fn delete(&self, api: &dyn CloudApi, id: i64) -> ApiResult<()>;
}

/// Convergence client for one resource kind, sharing one API handle.
pub struct Converger<K: Kind> {
    api: Arc<dyn CloudApi>,
    kind: K,
}

impl<K: Kind> Converger<K> {
    pub fn new(api: Arc<dyn CloudApi>, kind: K) -> Self {
        Self { api, kind }
    }

    fn extract<'a>(&self, mr: &'a mut ManagedResource) -> Result<&'a mut K::Resource> {
        let actual = mr.kind();
        self.kind.resource(mr).ok_or(Error::WrongKind {
            expected: K::KIND,
            actual,
        })
    }
}

#[async_trait]
impl<K: Kind> ExternalClient for Converger<K> {
    async fn observe(
        &self,
        ctx: &ReconcileContext,
        mr: &mut ManagedResource,
    ) -> Result<Observation> {
        let res = self.extract(mr)?;
        let name = res.meta().external_name().to_string();

        let found = match ctx
            .run(self.kind.get_by_name(self.api.as_ref(), &name))
            .await
        {
            Ok(found) => found,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };

        let Some(external) = found.filter(|ext| self.kind.external_id(ext) > 0) else {
            debug!(kind = %K::KIND, name = %name, "External resource does not exist");
            return Ok(Observation::default());
        };

        let connection_details = self.kind.record(res, &external);
        let up_to_date = self.kind.up_to_date(res, &external);
        debug!(
            kind = %K::KIND,
            name = %name,
            id = self.kind.external_id(&external),
            up_to_date,
            "Observed external resource"
        );

        Ok(Observation {
            resource_exists: true,
            resource_up_to_date: up_to_date,
            connection_details,
        })
    }

    async fn create(&self, ctx: &ReconcileContext, mr: &mut ManagedResource) -> Result<Creation> {
        let res = self.extract(mr)?;
        let name = res.meta().external_name().to_string();

        let request = self.kind.create_request(res)?;

        info!(kind = %K::KIND, name = %name, "Creating external resource");
        let connection_details = ctx
            .run(self.kind.create(self.api.as_ref(), &request))
            .await?;

        Ok(Creation { connection_details })
    }

    async fn update(
        &self,
        ctx: &ReconcileContext,
        mr: &mut ManagedResource,
    ) -> Result<ExternalUpdate> {
        let res = self.extract(mr)?;
        let name = res.meta().external_name().to_string();
        let id = res.provider_id();
        if id <= 0 {
            return Err(Error::MissingId {
                kind: K::KIND,
                name,
            });
        }

        let request = self.kind.update_request(res);

        info!(kind = %K::KIND, name = %name, id, "Updating external resource");
        ctx.run(self.kind.update(self.api.as_ref(), id, &request))
            .await?;

        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, ctx: &ReconcileContext, mr: &mut ManagedResource) -> Result<()> {
        let res = self.extract(mr)?;
        let name = res.meta().external_name().to_string();
        let id = res.provider_id();
        if id <= 0 {
            debug!(kind = %K::KIND, name = %name, "No provider id recorded, nothing to delete");
            return Ok(());
        }

        info!(kind = %K::KIND, name = %name, id, "Deleting external resource");
        match ctx.run(self.kind.delete(self.api.as_ref(), id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!(kind = %K::KIND, name = %name, id, "External resource already gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Build the convergence client for `kind`.
pub fn client_for(kind: ResourceKind, api: Arc<dyn CloudApi>) -> Box<dyn ExternalClient> {
    match kind {
        ResourceKind::Server => Box::new(Converger::new(api, ServerKind)),
        ResourceKind::Firewall => Box::new(Converger::new(api, FirewallKind)),
        ResourceKind::PlacementGroup => Box::new(Converger::new(api, PlacementGroupKind)),
        ResourceKind::SshKey => Box::new(Converger::new(api, SshKeyKind)),
    }
}
