//! Server managed resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Labels, Managed, ResourceMeta};
use crate::ident::IntOrName;

/// Public network attachment of a server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicNetwork {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_ipv4: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_ipv6: Option<bool>,
    /// Id of an existing primary IPv4 to assign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<i64>,
    /// Id of an existing primary IPv6 to assign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerParameters {
    pub server_type: IntOrName,
    pub image: IntOrName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_keys: Option<Vec<IntOrName>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<IntOrName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<IntOrName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_after_create: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automount: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firewalls: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement_group: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_net: Option<PublicNetwork>,
}

impl ServerParameters {
    /// Parameters with only the two required references set.
    pub fn new(server_type: impl Into<IntOrName>, image: impl Into<IntOrName>) -> Self {
        Self {
            server_type: server_type.into(),
            image: image.into(),
            ssh_keys: None,
            location: None,
            datacenter: None,
            user_data: None,
            start_after_create: None,
            labels: None,
            automount: None,
            volumes: None,
            networks: None,
            firewalls: None,
            placement_group: None,
            public_net: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerObservation {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Runtime status reported by the provider, e.g. `running`.
    #[serde(default)]
    pub status: String,
    /// Reverse DNS of the public IPv4.
    #[serde(default)]
    pub dns: String,
    #[serde(default)]
    pub ipv4: String,
    #[serde(default)]
    pub ipv6: String,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSpec {
    pub for_provider: ServerParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    #[serde(default)]
    pub at_provider: ServerObservation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub metadata: ResourceMeta,
    pub spec: ServerSpec,
    #[serde(default)]
    pub status: ServerStatus,
}

impl Server {
    pub fn new(name: impl Into<String>, for_provider: ServerParameters) -> Self {
        Self {
            metadata: ResourceMeta::new(name),
            spec: ServerSpec { for_provider },
            status: ServerStatus::default(),
        }
    }
}

impl Managed for Server {
    fn meta(&self) -> &ResourceMeta {
        &self.metadata
    }

    fn provider_id(&self) -> i64 {
        self.status.at_provider.id
    }

    fn desired_labels(&self) -> Option<&Labels> {
        self.spec.for_provider.labels.as_ref()
    }
}
