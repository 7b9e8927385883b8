use async_trait::async_trait;
use pac_routing_domain::DomainError;

#[async_trait]
pub trait SmlResolver: Send + Sync {
    /// Returns the SMP base URL published for `hostname`, `None` when the
    /// directory has no entry for it.
    async fn resolve_smp_url(&self, hostname: &str) -> Result<Option<String>, DomainError>;
}
