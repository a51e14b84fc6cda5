//! One observe-then-act pass over a single managed resource.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::context::ReconcileContext;
use crate::converge::{ConnectionDetails, ExternalClient};
use crate::error::Result;
use crate::resource::ManagedResource;

/// What a reconcile pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileAction {
    Created,
    Updated,
    UpToDate,
    Deleted,
    /// Marked for deletion and already gone.
    Absent,
}

impl fmt::Display for ReconcileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileAction::Created => write!(f, "created"),
            ReconcileAction::Updated => write!(f, "updated"),
            ReconcileAction::UpToDate => write!(f, "up_to_date"),
            ReconcileAction::Deleted => write!(f, "deleted"),
            ReconcileAction::Absent => write!(f, "absent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub action: ReconcileAction,
    /// Details from the observation, extended by those of the create call.
    pub connection_details: ConnectionDetails,
}

/// Observe `mr`, then issue at most one create, update or delete.
///
/// A resource marked for deletion is deleted when it exists. Otherwise a
/// missing resource is created and a stale one updated. Errors from any
/// step are returned as-is; the caller schedules the next attempt.
pub async fn reconcile_once(
    client: &dyn ExternalClient,
    ctx: &ReconcileContext,
    mr: &mut ManagedResource,
) -> Result<Reconciled> {
    let observation = client.observe(ctx, mr).await?;
    let mut connection_details = observation.connection_details;

    let action = if mr.meta().is_deleting() {
        if observation.resource_exists {
            client.delete(ctx, mr).await?;
            ReconcileAction::Deleted
        } else {
            ReconcileAction::Absent
        }
    } else if !observation.resource_exists {
        let created = client.create(ctx, mr).await?;
        connection_details.extend(created.connection_details);
        ReconcileAction::Created
    } else if !observation.resource_up_to_date {
        let updated = client.update(ctx, mr).await?;
        connection_details.extend(updated.connection_details);
        ReconcileAction::Updated
    } else {
        ReconcileAction::UpToDate
    };

    info!(kind = %mr.kind(), name = %mr.meta().name, %action, "Reconciled");
    Ok(Reconciled {
        action,
        connection_details,
    })
}
