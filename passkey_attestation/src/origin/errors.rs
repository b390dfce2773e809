use thiserror::Error;

use super::types::Origin;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OriginError {
    /// The asserted origin matched none of the configured origins
    #[error("Bad origin: {} is not one of {:?}", describe(.asserted), .configured)]
    BadOrigin {
        asserted: Option<Origin>,
        configured: Vec<Origin>,
    },

    /// The string is not a scheme://host[:port] origin
    #[error("Invalid origin: {0}")]
    Invalid(String),

    /// Error in origin configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from serde operations
    #[error("Serde error: {0}")]
    Serde(String),
}

fn describe(origin: &Option<Origin>) -> String {
    origin
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |o| o.to_string())
}
