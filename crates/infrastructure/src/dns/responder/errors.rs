use super::super::wire::WireError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("Invalid {record_type} record for {name}: {reason}")]
    InvalidRecord {
        name: String,
        record_type: String,
        reason: String,
    },

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Wire(#[from] WireError),
}
