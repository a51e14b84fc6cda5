//! Firewall managed resource.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Labels, Managed, ResourceMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleDirection {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleProtocol {
    Tcp,
    Udp,
    Icmp,
    Esp,
    Gre,
}

/// One firewall rule as declared by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub direction: RuleDirection,
    pub protocol: RuleProtocol,
    /// Single port or range such as `80` or `8000-8080`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_ips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Declared kind of a firewall target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Server,
    LabelSelector,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Server => f.write_str("server"),
            TargetType::LabelSelector => f.write_str("label_selector"),
        }
    }
}

/// What the firewall applies to, as declared by the user.
///
/// Exactly one of `label_selector` and `server` must be set, matching `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallResource {
    #[serde(rename = "type")]
    pub target_type: TargetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<i64>,
}

impl FirewallResource {
    pub fn server(id: i64) -> Self {
        Self {
            target_type: TargetType::Server,
            label_selector: None,
            server: Some(id),
        }
    }

    pub fn label_selector(selector: impl Into<String>) -> Self {
        Self {
            target_type: TargetType::LabelSelector,
            label_selector: Some(selector.into()),
            server: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirewallParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<FirewallRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_to: Option<Vec<FirewallResource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallObservation {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallSpec {
    pub for_provider: FirewallParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallStatus {
    #[serde(default)]
    pub at_provider: FirewallObservation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Firewall {
    pub metadata: ResourceMeta,
    pub spec: FirewallSpec,
    #[serde(default)]
    pub status: FirewallStatus,
}

impl Firewall {
    pub fn new(name: impl Into<String>, for_provider: FirewallParameters) -> Self {
        Self {
            metadata: ResourceMeta::new(name),
            spec: FirewallSpec { for_provider },
            status: FirewallStatus::default(),
        }
    }
}

impl Managed for Firewall {
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
