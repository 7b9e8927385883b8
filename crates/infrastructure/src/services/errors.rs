use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Failed to spawn {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Service {name} not ready within {timeout_secs}s")]
    NotReady { name: String, timeout_secs: u64 },

    #[error("No free port available: {0}")]
    NoFreePort(#[source] std::io::Error),

    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Failed to stop {name}: {reason}")]
    Stop { name: String, reason: String },
}
