use crate::config::ConfigError;
use crate::rrset::GroupError;
use crate::zone::ZoneError;
use thiserror::Error;

/// Unified error type for zone file reads
#[derive(Debug, Error)]
pub enum ZonefileError {
    /// The zone text could not be parsed
    #[error("zone parse error: {0}")]
    Zone(#[from] ZoneError),

    /// An RRSet violates RFC 2181 section 5.2
    #[error(transparent)]
    Group(#[from] GroupError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ZonefileError>;
