//! SSH key managed resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Labels, Managed, ResourceMeta};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshKeyParameters {
    pub public_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshKeyObservation {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshKeySpec {
    pub for_provider: SshKeyParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshKeyStatus {
    #[serde(default)]
    pub at_provider: SshKeyObservation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SshKey {
    pub metadata: ResourceMeta,
    pub spec: SshKeySpec,
    #[serde(default)]
    pub status: SshKeyStatus,
}

impl SshKey {
    pub fn new(name: impl Into<String>, for_provider: SshKeyParameters) -> Self {
        Self {
            metadata: ResourceMeta::new(name),
            spec: SshKeySpec { for_provider },
            status: SshKeyStatus::default(),
        }
    }
}

impl Managed for SshKey {
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
