//! Managed resource types.
//!
//! A managed resource pairs the desired parameters (`spec.forProvider`) with
//! the status projection written back after each observation
//! (`status.atProvider`). The scheduler owns both and persists them; this
//! crate only mutates the in-memory copy it is handed.

pub mod firewall;
pub mod placement_group;
pub mod server;
pub mod ssh_key;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use firewall::Firewall;
pub use placement_group::PlacementGroup;
pub use server::Server;
pub use ssh_key::SshKey;

/// Label set attached to provider objects.
pub type Labels = HashMap<String, String>;

/// Annotation carrying the provider-facing name of a resource.
pub const EXTERNAL_NAME_ANNOTATION: &str = "crossplane.io/external-name";

fn default_provider_config() -> String {
    "default".to_string()
}

/// Resource kinds handled by this provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Server,
    Firewall,
    PlacementGroup,
    #[serde(rename = "SSHKey")]
    SshKey,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::Server => "Server",
            ResourceKind::Firewall => "Firewall",
            ResourceKind::PlacementGroup => "PlacementGroup",
            ResourceKind::SshKey => "SSHKey",
        };
        f.write_str(s)
    }
}

/// Control-plane metadata of a managed resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    /// Reference handed to the credential source.
    #[serde(default = "default_provider_config")]
    pub provider_config_ref: String,
    /// Set once the resource has been marked for deletion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<DateTime<Utc>>,
}

impl ResourceMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: BTreeMap::new(),
            provider_config_ref: default_provider_config(),
            deletion_timestamp: None,
        }
    }

    /// Name used to look the resource up at the provider.
    ///
    /// Falls back to the control-plane name when no external name is annotated.
    pub fn external_name(&self) -> &str {
        self.annotations
            .get(EXTERNAL_NAME_ANNOTATION)
            .filter(|name| !name.is_empty())
            .map(String::as_str)
            .unwrap_or(&self.name)
    }

    pub fn set_external_name(&mut self, name: impl Into<String>) {
        self.annotations
            .insert(EXTERNAL_NAME_ANNOTATION.to_string(), name.into());
    }

    pub fn is_deleting(&self) -> bool {
        self.deletion_timestamp.is_some()
    }
}

/// Accessors shared by every managed resource kind.
pub trait Managed {
    fn meta(&self) -> &ResourceMeta;

    /// Provider id recorded by the last observation, zero when never observed.
    fn provider_id(&self) -> i64;

    fn desired_labels(&self) -> Option<&Labels>;
}

/// Any managed resource handled by the provider, tagged by `kind` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ManagedResource {
    Server(Server),
    Firewall(Firewall),
    PlacementGroup(PlacementGroup),
    #[serde(rename = "SSHKey")]
    SshKey(SshKey),
}

impl ManagedResource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ManagedResource::Server(_) => ResourceKind::Server,
            ManagedResource::Firewall(_) => ResourceKind::Firewall,
            ManagedResource::PlacementGroup(_) => ResourceKind::PlacementGroup,
            ManagedResource::SshKey(_) => ResourceKind::SshKey,
        }
    }

    pub fn meta(&self) -> &ResourceMeta {
        match self {
            ManagedResource::Server(r) => r.meta(),
            ManagedResource::Firewall(r) => r.meta(),
            ManagedResource::PlacementGroup(r) => r.meta(),
            ManagedResource::SshKey(r) => r.meta(),
        }
    }

    pub fn meta_mut(&mut self) -> &mut ResourceMeta {
        match self {
            ManagedResource::Server(r) => &mut r.metadata,
            ManagedResource::Firewall(r) => &mut r.metadata,
            ManagedResource::PlacementGroup(r) => &mut r.metadata,
            ManagedResource::SshKey(r) => &mut r.metadata,
        }
    }

    pub fn provider_id(&self) -> i64 {
        match self {
            ManagedResource::Server(r) => r.provider_id(),
            ManagedResource::Firewall(r) => r.provider_id(),
            ManagedResource::PlacementGroup(r) => r.provider_id(),
            ManagedResource::SshKey(r) => r.provider_id(),
        }
    }
}

impl From<Server> for ManagedResource {
    fn from(r: Server) -> Self {
        ManagedResource::Server(r)
    }
}

impl From<Firewall> for ManagedResource {
    fn from(r: Firewall) -> Self {
        ManagedResource::Firewall(r)
    }
}

impl From<PlacementGroup> for ManagedResource {
    fn from(r: PlacementGroup) -> Self {
        ManagedResource::PlacementGroup(r)
    }
}

impl From<SshKey> for ManagedResource {
    fn from(r: SshKey) -> Self {
        ManagedResource::SshKey(r)
    }
}
