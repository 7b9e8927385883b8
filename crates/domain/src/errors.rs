use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Invalid invoice message: {0}")]
    InvalidInvoiceMessage(String),

    #[error("Unknown error code: {0}")]
    UnknownErrorCode(String),

    #[error("Unknown participant scheme: {0}")]
    UnknownScheme(String),

    #[error("Publish to {subject} failed: {reason}")]
    PublishFailed { subject: String, reason: String },

    #[error("Discovery lookup failed: {0}")]
    LookupFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
