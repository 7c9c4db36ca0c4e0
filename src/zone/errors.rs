use thiserror::Error;

/// Zone reading errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneError {
    /// Zone file syntax error
    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: String },
    /// Zone content exceeds the configured limit
    #[error("zone content is {size} bytes, exceeding the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
}

impl ZoneError {
    pub(crate) fn syntax(line: usize, reason: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ZoneError>;
