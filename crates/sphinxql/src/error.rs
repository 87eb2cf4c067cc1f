use thiserror::Error;

#[derive(Error, Debug)]
pub enum SphinxQlError {
    #[error("Query build error: {0}")]
    Build(String),

    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Execution error: {0}")]
    Execution(#[source] sqlx::Error),

    #[error("Failed to decode column `{column}`: {message}")]
    Decode { column: String, message: String },
}

impl SphinxQlError {
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build(message.into())
    }

    /// Sorts a driver error into connection-level or daemon-side failure.
    pub fn from_driver(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_)
            | sqlx::Error::Protocol(_) => Self::Connection(err),
            other => Self::Execution(other),
        }
    }

    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

pub type Result<T> = std::result::Result<T, SphinxQlError>;
