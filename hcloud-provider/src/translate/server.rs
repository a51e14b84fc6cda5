//! Server create request translation.

use crate::hcloud::types::{ServerCreateFirewall, ServerCreatePublicNet, ServerCreateRequest};
use crate::ident::{self, ResourceRef};
use crate::resource::server::{PublicNetwork, ServerParameters};

/// Build the create request for a server named `name`.
///
/// Type, image, location, datacenter and SSH keys go through the identity
/// resolver; name references are forwarded for the provider to resolve.
pub fn create_request(name: &str, params: &ServerParameters) -> ServerCreateRequest {
    ServerCreateRequest {
        name: name.to_string(),
        server_type: ident::resolve(&params.server_type),
        image: ident::resolve(&params.image),
        ssh_keys: params
            .ssh_keys
            .as_ref()
            .map(|keys| keys.iter().map(ident::resolve).collect()),
        location: params.location.as_ref().map(ident::resolve),
        datacenter: params.datacenter.as_ref().map(ident::resolve),
        user_data: params.user_data.clone(),
        start_after_create: params.start_after_create,
        labels: params.labels.clone(),
        automount: params.automount,
        volumes: params.volumes.as_deref().map(by_ids),
        networks: params.networks.as_deref().map(by_ids),
        firewalls: params.firewalls.as_ref().map(|ids| {
            ids.iter()
                .map(|&id| ServerCreateFirewall {
                    firewall: ResourceRef::by_id(id),
                })
                .collect()
        }),
        placement_group: params.placement_group.map(ResourceRef::by_id),
        public_net: params.public_net.as_ref().map(public_net),
    }
}

fn by_ids(ids: &[i64]) -> Vec<ResourceRef> {
    ids.iter().copied().map(ResourceRef::by_id).collect()
}

fn public_net(net: &PublicNetwork) -> ServerCreatePublicNet {
    ServerCreatePublicNet {
        enable_ipv4: net.enable_ipv4,
        enable_ipv6: net.enable_ipv6,
        ipv4: net.ipv4.map(ResourceRef::by_id),
        ipv6: net.ipv6.map(ResourceRef::by_id),
    }
}
