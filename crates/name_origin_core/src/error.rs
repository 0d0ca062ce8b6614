use thiserror::Error;

#[derive(Debug, Error)]
pub enum OriginError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{service} service unavailable")]
    UpstreamUnavailable { service: &'static str },

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl OriginError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidInput(_) => 422,
            Self::UpstreamUnavailable { .. } => 503,
            Self::Database(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// Message safe to return to a client. Storage and internal failures are
    /// reduced to a generic string; the cause stays in the logs.
    pub fn public_detail(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(msg) | Self::InvalidInput(msg) => msg.clone(),
            Self::UpstreamUnavailable { .. } => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OriginError>;
