//! Error types for convergence operations.

use thiserror::Error;

use crate::hcloud::ApiError;
use crate::resource::ResourceKind;
use crate::translate::TranslationError;

/// Errors returned by connect, observe, create, update and delete.
///
/// Nothing here is retried internally; the caller decides whether and when
/// to try again.
#[derive(Debug, Error)]
pub enum Error {
    /// The managed resource handed to a client is of another kind.
    #[error("managed resource is not a {expected} custom resource (got {actual})")]
    WrongKind {
        expected: ResourceKind,
        actual: ResourceKind,
    },

    /// Credentials could not be resolved.
    #[error("cannot get credentials: {0}")]
    Credentials(String),

    /// The provider API client could not be constructed.
    #[error("cannot create new service: {0}")]
    Connect(String),

    /// The desired spec cannot be translated into a provider request.
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// The provider API failed or rejected the request.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// An update was requested before an observation recorded the provider id.
    #[error("{kind} {name} has no provider id recorded in status")]
    MissingId { kind: ResourceKind, name: String },

    /// The reconcile context was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// The reconcile context deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl Error {
    /// Create a credentials error with the given message.
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Create a connect error with the given message.
    pub fn connect(msg: impl Into<String>) -> Self {
        Self::Connect(msg.into())
    }

    /// True when the provider reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(e) if e.is_not_found())
    }
}

/// Result type for convergence operations.
pub type Result<T> = std::result::Result<T, Error>;
