use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("redis container failed: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("invalid redis url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: redis::RedisError,
    },

    #[error("redis at '{url}' still unreachable after {attempts} attempts: {source}")]
    Unreachable {
        url: String,
        attempts: u32,
        #[source]
        source: redis::RedisError,
    },
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
