use async_trait::async_trait;
use pac_routing_domain::PeppolEndpoint;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmpError {
    #[error("SMP request timed out")]
    Timeout,

    #[error("SMP returned HTTP {0}")]
    Status(u16),

    #[error("SMP request failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait SmpClient: Send + Sync {
    /// Fetches the service metadata of one participant for one document type.
    ///
    /// `Ok(None)` means the SMP answered but published no usable AS4
    /// endpoint (or the body could not be read as metadata).
    async fn fetch_endpoint(
        &self,
        smp_url: &str,
        scheme_id: &str,
        participant_id: &str,
        document_type_id: &str,
    ) -> Result<Option<PeppolEndpoint>, SmpError>;
}
