//! Translation of desired specs into provider requests.
//!
//! Translation is pure. It either yields a complete request or an error,
//! never a partially filled one, and it runs before any network call.

pub mod firewall;
pub mod server;

use thiserror::Error;

use crate::resource::firewall::TargetType;

/// Malformed input that will fail again until the spec changes.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("rule {rule}: invalid CIDR {cidr:?}: {source}")]
    InvalidCidr {
        rule: usize,
        cidr: String,
        source: ipnet::AddrParseError,
    },

    #[error("apply_to[{index}]: both label_selector and server are set")]
    AmbiguousTarget { index: usize },

    #[error("apply_to[{index}]: neither label_selector nor server is set")]
    MissingTarget { index: usize },

    #[error("apply_to[{index}]: type is {declared} but only {actual} is set")]
    TargetTypeMismatch {
        index: usize,
        declared: TargetType,
        actual: TargetType,
    },
}
