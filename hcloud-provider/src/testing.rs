//! In-memory `CloudApi` for unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::hcloud::types::{
    Firewall, FirewallCreateRequest, PlacementGroup, PlacementGroupCreateRequest, Server,
    ServerCreateRequest, ServerCreateResponse, ServerIpv4, ServerIpv6, ServerPublicNet, SshKey,
    SshKeyCreateRequest, UpdateRequest,
};
use crate::hcloud::{ApiError, ApiResult, CloudApi};

#[derive(Default)]
struct State {
    next_id: i64,
    calls: Vec<String>,
    fail_next: Option<ApiError>,
    hang: bool,
    servers: BTreeMap<i64, Server>,
    firewalls: BTreeMap<i64, Firewall>,
    placement_groups: BTreeMap<i64, PlacementGroup>,
    ssh_keys: BTreeMap<i64, SshKey>,
    server_requests: Vec<ServerCreateRequest>,
    firewall_requests: Vec<FirewallCreateRequest>,
    update_requests: Vec<UpdateRequest>,
}

/// Fake provider recording every call as `"<operation> <argument>"`.
#[derive(Default)]
pub struct FakeCloud {
    state: Mutex<State>,
}

pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

impl FakeCloud {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().next_id = 100;
        fake
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Fail the next call with `err`.
    pub fn fail_with(&self, err: ApiError) {
        self.state.lock().unwrap().fail_next = Some(err);
    }

    /// Make every following call pend forever.
    pub fn hang(&self) {
        self.state.lock().unwrap().hang = true;
    }

    pub fn server_requests(&self) -> Vec<ServerCreateRequest> {
        self.state.lock().unwrap().server_requests.clone()
    }

    pub fn firewall_requests(&self) -> Vec<FirewallCreateRequest> {
        self.state.lock().unwrap().firewall_requests.clone()
    }

    pub fn update_requests(&self) -> Vec<UpdateRequest> {
        self.state.lock().unwrap().update_requests.clone()
    }

    pub fn insert_server(&self, name: &str, labels: &[(&str, &str)]) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate();
        state.servers.insert(
            id,
            Server {
                id,
                name: name.to_string(),
                status: "running".to_string(),
                created: created_at(),
                labels: to_labels(labels),
                public_net: ServerPublicNet {
                    ipv4: Some(ServerIpv4 {
                        ip: "203.0.113.10".to_string(),
                        dns_ptr: "static.10.113.0.203.clients.your-server.de".to_string(),
                    }),
                    ipv6: Some(ServerIpv6 {
                        ip: "2001:db8:1234::/64".to_string(),
                    }),
                },
            },
        );
        id
    }

    pub fn insert_firewall(&self, name: &str, labels: &[(&str, &str)]) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate();
        state.firewalls.insert(
            id,
            Firewall {
                id,
                name: name.to_string(),
                created: created_at(),
                labels: to_labels(labels),
                rules: Vec::new(),
                applied_to: Vec::new(),
            },
        );
        id
    }

    pub fn insert_placement_group(&self, name: &str, labels: &[(&str, &str)]) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate();
        state.placement_groups.insert(
            id,
            PlacementGroup {
                id,
                name: name.to_string(),
                created: created_at(),
                group_type: Default::default(),
                labels: to_labels(labels),
                servers: vec![7, 8],
            },
        );
        id
    }

    pub fn insert_ssh_key(&self, name: &str, labels: &[(&str, &str)]) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate();
        state.ssh_keys.insert(
            id,
            SshKey {
                id,
                name: name.to_string(),
                fingerprint: "b7:2f:30:a0:2f:6c:58:6c:21:04:58:61:ba:06:3b:2f".to_string(),
                public_key: "ssh-ed25519 AAAA deploy".to_string(),
                created: created_at(),
                labels: to_labels(labels),
            },
        );
        id
    }

    pub fn ssh_key(&self, id: i64) -> Option<SshKey> {
        self.state.lock().unwrap().ssh_keys.get(&id).cloned()
    }

    pub fn placement_group(&self, id: i64) -> Option<PlacementGroup> {
        self.state.lock().unwrap().placement_groups.get(&id).cloned()
    }

    /// Record the call and decide whether it proceeds, fails or hangs.
    async fn enter(&self, call: String) -> ApiResult<()> {
        let (hang, fail) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(call);
            (state.hang, state.fail_next.take())
        };
        if hang {
            std::future::pending::<()>().await;
        }
        match fail {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl State {
    fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

fn to_labels(pairs: &[(&str, &str)]) -> crate::resource::Labels {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn missing(kind: &str, id: i64) -> ApiError {
    ApiError::not_found(format!("{kind} with ID {id} not found"))
}

#[async_trait]
impl CloudApi for FakeCloud {
    async fn get_server_by_name(&self, name: &str) -> ApiResult<Option<Server>> {
        self.enter(format!("get_server_by_name {name}")).await?;
        let state = self.state.lock().unwrap();
        Ok(state.servers.values().find(|s| s.name == name).cloned())
    }

    async fn create_server(&self, req: &ServerCreateRequest) -> ApiResult<ServerCreateResponse> {
        self.enter(format!("create_server {}", req.name)).await?;
        let mut state = self.state.lock().unwrap();
        state.server_requests.push(req.clone());
        let id = state.allocate();
        let server = Server {
            id,
            name: req.name.clone(),
            status: "initializing".to_string(),
            created: created_at(),
            labels: req.labels.clone().unwrap_or_default(),
            public_net: ServerPublicNet::default(),
        };
        state.servers.insert(id, server.clone());
        let root_password = match &req.ssh_keys {
            Some(keys) if !keys.is_empty() => None,
            _ => Some("YItygq1v3GYjjMomLaKc".to_string()),
        };
        Ok(ServerCreateResponse {
            server,
            root_password,
        })
    }

    async fn update_server(&self, id: i64, req: &UpdateRequest) -> ApiResult<Server> {
        self.enter(format!("update_server {id}")).await?;
        let mut state = self.state.lock().unwrap();
        state.update_requests.push(req.clone());
        let server = state.servers.get_mut(&id).ok_or_else(|| missing("server", id))?;
        if let Some(labels) = &req.labels {
            server.labels = labels.clone();
        }
        Ok(server.clone())
    }

    async fn delete_server(&self, id: i64) -> ApiResult<()> {
        self.enter(format!("delete_server {id}")).await?;
        let mut state = self.state.lock().unwrap();
        state
            .servers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("server", id))
    }

    async fn get_firewall_by_name(&self, name: &str) -> ApiResult<Option<Firewall>> {
        self.enter(format!("get_firewall_by_name {name}")).await?;
        let state = self.state.lock().unwrap();
        Ok(state.firewalls.values().find(|f| f.name == name).cloned())
    }

    async fn create_firewall(&self, req: &FirewallCreateRequest) -> ApiResult<Firewall> {
        self.enter(format!("create_firewall {}", req.name)).await?;
        let mut state = self.state.lock().unwrap();
        state.firewall_requests.push(req.clone());
        let id = state.allocate();
        let firewall = Firewall {
            id,
            name: req.name.clone(),
            created: created_at(),
            labels: req.labels.clone().unwrap_or_default(),
            rules: req.rules.clone().unwrap_or_default(),
            applied_to: req.apply_to.clone().unwrap_or_default(),
        };
        state.firewalls.insert(id, firewall.clone());
        Ok(firewall)
    }

    async fn update_firewall(&self, id: i64, req: &UpdateRequest) -> ApiResult<Firewall> {
        self.enter(format!("update_firewall {id}")).await?;
        let mut state = self.state.lock().unwrap();
        state.update_requests.push(req.clone());
        let firewall = state
            .firewalls
            .get_mut(&id)
            .ok_or_else(|| missing("firewall", id))?;
        if let Some(labels) = &req.labels {
            firewall.labels = labels.clone();
        }
        Ok(firewall.clone())
    }

    async fn delete_firewall(&self, id: i64) -> ApiResult<()> {
        self.enter(format!("delete_firewall {id}")).await?;
        let mut state = self.state.lock().unwrap();
        state
            .firewalls
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("firewall", id))
    }

    async fn get_placement_group_by_name(&self, name: &str) -> ApiResult<Option<PlacementGroup>> {
        self.enter(format!("get_placement_group_by_name {name}"))
            .await?;
        let state = self.state.lock().unwrap();
        Ok(state
            .placement_groups
            .values()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn create_placement_group(
        &self,
        req: &PlacementGroupCreateRequest,
    ) -> ApiResult<PlacementGroup> {
        self.enter(format!("create_placement_group {}", req.name))
            .await?;
        let mut state = self.state.lock().unwrap();
        let id = state.allocate();
        let group = PlacementGroup {
            id,
            name: req.name.clone(),
            created: created_at(),
            group_type: req.group_type,
            labels: req.labels.clone().unwrap_or_default(),
            servers: Vec::new(),
        };
        state.placement_groups.insert(id, group.clone());
        Ok(group)
    }

    async fn update_placement_group(
        &self,
        id: i64,
        req: &UpdateRequest,
    ) -> ApiResult<PlacementGroup> {
        self.enter(format!("update_placement_group {id}")).await?;
        let mut state = self.state.lock().unwrap();
        state.update_requests.push(req.clone());
        let group = state
            .placement_groups
            .get_mut(&id)
            .ok_or_else(|| missing("placement group", id))?;
        if let Some(labels) = &req.labels {
            group.labels = labels.clone();
        }
        Ok(group.clone())
    }

    async fn delete_placement_group(&self, id: i64) -> ApiResult<()> {
        self.enter(format!("delete_placement_group {id}")).await?;
        let mut state = self.state.lock().unwrap();
        state
            .placement_groups
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("placement group", id))
    }

    async fn get_ssh_key_by_name(&self, name: &str) -> ApiResult<Option<SshKey>> {
        self.enter(format!("get_ssh_key_by_name {name}")).await?;
        let state = self.state.lock().unwrap();
        Ok(state.ssh_keys.values().find(|k| k.name == name).cloned())
    }

    async fn create_ssh_key(&self, req: &SshKeyCreateRequest) -> ApiResult<SshKey> {
        self.enter(format!("create_ssh_key {}", req.name)).await?;
        let mut state = self.state.lock().unwrap();
        let id = state.allocate();
        let key = SshKey {
            id,
            name: req.name.clone(),
            fingerprint: "b7:2f:30:a0:2f:6c:58:6c:21:04:58:61:ba:06:3b:2f".to_string(),
            public_key: req.public_key.clone(),
            created: created_at(),
            labels: req.labels.clone().unwrap_or_default(),
        };
        state.ssh_keys.insert(id, key.clone());
        Ok(key)
    }

    async fn update_ssh_key(&self, id: i64, req: &UpdateRequest) -> ApiResult<SshKey> {
        self.enter(format!("update_ssh_key {id}")).await?;
        let mut state = self.state.lock().unwrap();
        state.update_requests.push(req.clone());
        let key = state
            .ssh_keys
            .get_mut(&id)
            .ok_or_else(|| missing("SSH key", id))?;
        if let Some(name) = &req.name {
            key.name = name.clone();
        }
        if let Some(labels) = &req.labels {
            key.labels = labels.clone();
        }
        Ok(key.clone())
    }

    async fn delete_ssh_key(&self, id: i64) -> ApiResult<()> {
        self.enter(format!("delete_ssh_key {id}")).await?;
        let mut state = self.state.lock().unwrap();
        state
            .ssh_keys
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("SSH key", id))
    }
}
