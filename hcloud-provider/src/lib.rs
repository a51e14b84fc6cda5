//! hcloud-provider: converges Hetzner Cloud resources to a declared spec.
//!
//! The crate is the external-resource layer of a managed-resource provider.
//! An external scheduler hands it one managed resource at a time; for every
//! resource kind the crate knows how to:
//! - look the resource up in Hetzner Cloud by its external name
//! - decide whether the observed labels match the desired ones
//! - issue the single create, update or delete call needed to converge
//!
//! Polling, retries, condition bookkeeping and persistence stay with the caller.

pub mod compare;
pub mod config;
pub mod connect;
pub mod context;
pub mod converge;
pub mod error;
pub mod hcloud;
pub mod ident;
pub mod reconcile;
pub mod resource;
pub mod translate;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ClientConfig;
pub use connect::{
    Connector, CredentialSource, EnvCredentials, FileCredentials, HcloudServiceFactory,
    ServiceFactory, StaticCredentials,
};
pub use context::ReconcileContext;
pub use converge::{ConnectionDetails, Creation, ExternalClient, ExternalUpdate, Observation};
pub use error::{Error, Result};
pub use ident::{IntOrName, ResourceRef};
pub use reconcile::{ReconcileAction, Reconciled, reconcile_once};
pub use resource::{Labels, ManagedResource, ResourceKind, ResourceMeta};
