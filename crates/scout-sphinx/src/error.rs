use sphinxql::SphinxQlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid searchable model: {0}")]
    InvalidModel(String),

    #[error(transparent)]
    Query(#[from] SphinxQlError),

    #[error("Repository error: {0}")]
    Repository(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connection,
    Build,
    Execution,
    Configuration,
    Model,
    Repository,
}

impl ScoutError {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Query(SphinxQlError::Connection(_)) => ErrorCategory::Connection,
            Self::Query(SphinxQlError::Build(_)) => ErrorCategory::Build,
            Self::Query(SphinxQlError::Execution(_) | SphinxQlError::Decode { .. }) => {
                ErrorCategory::Execution
            }
            Self::Config(_) | Self::Io(_) | Self::Toml(_) => ErrorCategory::Configuration,
            Self::InvalidModel(_) => ErrorCategory::Model,
            Self::Repository(_) => ErrorCategory::Repository,
        }
    }

    pub const fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 3,
            ErrorCategory::Model | ErrorCategory::Build => 4,
            ErrorCategory::Connection => 5,
            ErrorCategory::Execution => 6,
            ErrorCategory::Repository => 10,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;
