//! Building convergence clients from provider credentials.
//!
//! A managed resource names its provider config; the [`CredentialSource`]
//! turns that name into a raw API token and the [`ServiceFactory`] turns the
//! token into a [`CloudApi`] handle. [`Connector`] ties both together and
//! hands back the client for the resource's kind.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{ClientConfig, DEFAULT_TOKEN_ENV};
use crate::context::ReconcileContext;
use crate::converge::{ExternalClient, client_for};
use crate::error::{Error, Result};
use crate::hcloud::{CloudApi, HcloudClient};
use crate::resource::ManagedResource;

/// Resolves the credentials referenced by a provider config.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn credentials(&self, provider_config: &str) -> Result<Vec<u8>>;
}

/// Builds a provider API handle from raw credentials.
pub trait ServiceFactory: Send + Sync {
    fn new_service(&self, credentials: &[u8]) -> Result<Arc<dyn CloudApi>>;
}

/// The same credentials for every provider config.
#[derive(Clone)]
pub struct StaticCredentials(Vec<u8>);

impl StaticCredentials {
    pub fn new(token: impl Into<Vec<u8>>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl CredentialSource for StaticCredentials {
    async fn credentials(&self, _provider_config: &str) -> Result<Vec<u8>> {
        Ok(self.0.clone())
    }
}

/// Credentials read from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_ENV)
    }
}

#[async_trait]
impl CredentialSource for EnvCredentials {
    async fn credentials(&self, provider_config: &str) -> Result<Vec<u8>> {
        debug!(provider_config, var = %self.var, "Reading credentials from environment");
        std::env::var(&self.var)
            .map(String::into_bytes)
            .map_err(|e| Error::credentials(format!("{}: {e}", self.var)))
    }
}

/// Credentials read from a file, e.g. a mounted secret.
#[derive(Debug, Clone)]
pub struct FileCredentials {
    path: PathBuf,
}

impl FileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CredentialSource for FileCredentials {
    async fn credentials(&self, provider_config: &str) -> Result<Vec<u8>> {
        debug!(provider_config, path = %self.path.display(), "Reading credentials from file");
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| Error::credentials(format!("{}: {e}", self.path.display())))
    }
}

/// Creates [`HcloudClient`]s against the configured endpoint.
#[derive(Debug, Clone, Default)]
pub struct HcloudServiceFactory {
    config: ClientConfig,
}

impl HcloudServiceFactory {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl ServiceFactory for HcloudServiceFactory {
    fn new_service(&self, credentials: &[u8]) -> Result<Arc<dyn CloudApi>> {
        let token = std::str::from_utf8(credentials)
            .map_err(|e| Error::connect(format!("token is not valid UTF-8: {e}")))?
            .trim();
        if token.is_empty() {
            return Err(Error::connect("empty API token"));
        }

        let client = HcloudClient::new(token, self.config.clone())
            .map_err(|e| Error::connect(e.to_string()))?;
        Ok(Arc::new(client))
    }
}

/// Produces the convergence client for a managed resource.
pub struct Connector {
    credentials: Arc<dyn CredentialSource>,
    factory: Arc<dyn ServiceFactory>,
}

impl Connector {
    pub fn new(credentials: Arc<dyn CredentialSource>, factory: Arc<dyn ServiceFactory>) -> Self {
        Self {
            credentials,
            factory,
        }
    }

    /// Resolve credentials for `mr` and build the client for its kind.
    ///
    /// Nothing is cached; every call resolves credentials again.
    pub async fn connect(
        &self,
        ctx: &ReconcileContext,
        mr: &ManagedResource,
    ) -> Result<Box<dyn ExternalClient>> {
        let provider_config = &mr.meta().provider_config_ref;
        let credentials = ctx
            .run(self.credentials.credentials(provider_config))
            .await?;
        let api = self.factory.new_service(&credentials)?;

        debug!(kind = %mr.kind(), name = %mr.meta().name, provider_config, "Connected");
        Ok(client_for(mr.kind(), api))
    }
}
