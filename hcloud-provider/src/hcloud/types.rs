//! Hetzner Cloud API request and response bodies.
//!
//! Optional request fields are skipped when unset so the provider applies its
//! own default; an explicitly empty list is still sent as `[]`.

use chrono::{DateTime, Utc};
use ipnet::IpNet;
use serde::{Deserialize, Serialize};

use crate::ident::ResourceRef;
use crate::resource::Labels;
use crate::resource::firewall::{RuleDirection, RuleProtocol};
use crate::resource::placement_group::PlacementGroupType;

// =============================================================================
// Servers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub public_net: ServerPublicNet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerPublicNet {
    #[serde(default)]
    pub ipv4: Option<ServerIpv4>,
    #[serde(default)]
    pub ipv6: Option<ServerIpv6>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerIpv4 {
    pub ip: String,
    #[serde(default)]
    pub dns_ptr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerIpv6 {
    /// Assigned /64 network.
    pub ip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerCreateRequest {
    pub name: String,
    pub server_type: ResourceRef,
    pub image: ResourceRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_keys: Option<Vec<ResourceRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_after_create: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automount: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<ResourceRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<ResourceRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firewalls: Option<Vec<ServerCreateFirewall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement_group: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_net: Option<ServerCreatePublicNet>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerCreateFirewall {
    pub firewall: ResourceRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerCreatePublicNet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_ipv4: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_ipv6: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<ResourceRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerCreateResponse {
    pub server: Server,
    /// Only issued when the server was created without SSH keys.
    #[serde(default)]
    pub root_password: Option<String>,
}

// =============================================================================
// Firewalls
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Firewall {
    pub id: i64,
    pub name: String,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub rules: Vec<FirewallRule>,
    #[serde(default)]
    pub applied_to: Vec<FirewallResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub direction: RuleDirection,
    pub protocol: RuleProtocol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ips: Option<Vec<IpNet>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_ips: Option<Vec<IpNet>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Firewall target on the wire, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FirewallResource {
    Server { server: FirewallServerRef },
    LabelSelector { label_selector: FirewallLabelSelector },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallServerRef {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallLabelSelector {
    pub selector: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirewallCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<FirewallRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_to: Option<Vec<FirewallResource>>,
}

// =============================================================================
// Placement Groups
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementGroup {
    pub id: i64,
    pub name: String,
    pub created: DateTime<Utc>,
    #[serde(rename = "type")]
    pub group_type: PlacementGroupType,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub servers: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementGroupCreateRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub group_type: PlacementGroupType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
}

// =============================================================================
// SSH Keys
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SshKey {
    pub id: i64,
    pub name: String,
    pub fingerprint: String,
    pub public_key: String,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SshKeyCreateRequest {
    pub name: String,
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
}

// =============================================================================
// Shared
// =============================================================================

/// Body of `PUT /{kind}/{id}`; every kind accepts the same mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
}
