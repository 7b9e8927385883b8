use async_trait::async_trait;
use bytes::Bytes;
use pac_routing_domain::DomainError;

/// Outbound side of a pipeline stage.
#[async_trait]
pub trait StagePublisher: Send + Sync {
    /// Publishes `payload` on `subject`, carrying the correlation id of the
    /// inbound message unchanged.
    async fn publish(
        &self,
        subject: &str,
        payload: Bytes,
        correlation_id: Option<&str>,
    ) -> Result<(), DomainError>;
}
