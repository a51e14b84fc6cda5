//! Placement group managed resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Labels, Managed, ResourceMeta};

/// Placement strategy. Hetzner Cloud currently only offers `spread`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementGroupType {
    #[default]
    Spread,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementGroupParameters {
    #[serde(rename = "type")]
    pub group_type: PlacementGroupType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementGroupObservation {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: Labels,
    /// Ids of the servers currently in the group.
    #[serde(default)]
    pub servers: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementGroupSpec {
    pub for_provider: PlacementGroupParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementGroupStatus {
    #[serde(default)]
    pub at_provider: PlacementGroupObservation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementGroup {
    pub metadata: ResourceMeta,
    pub spec: PlacementGroupSpec,
    #[serde(default)]
    pub status: PlacementGroupStatus,
}

impl PlacementGroup {
    pub fn new(name: impl Into<String>, for_provider: PlacementGroupParameters) -> Self {
        Self {
            metadata: ResourceMeta::new(name),
            spec: PlacementGroupSpec { for_provider },
            status: PlacementGroupStatus::default(),
        }
    }
}

impl Managed for PlacementGroup {
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
