use thiserror::Error;

use esglens_store::StoreError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] esglens_core::ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid parameter '{raw}': expected KEY=VALUE")]
    MalformedParam { raw: String },

    #[error("tool name must not be empty")]
    EmptyToolName,

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::MalformedParam { .. } | Self::EmptyToolName => 2,
            Self::Store(StoreError::Conflict { .. }) => 4,
            Self::Store(_) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
