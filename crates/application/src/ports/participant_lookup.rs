use async_trait::async_trait;
use pac_routing_domain::{DomainError, PeppolLookupResult, PeppolScheme};

/// Resolves a participant identifier to its delivery endpoint.
///
/// Every anticipated failure (DNS miss, SMP status, bad metadata) comes back
/// as an `Ok` result with `success == false`. `Err` is reserved for
/// failures the implementation did not anticipate.
#[async_trait]
pub trait ParticipantLookup: Send + Sync {
    async fn lookup(
        &self,
        scheme_id: &str,
        participant_id: &str,
        document_type: &str,
    ) -> Result<PeppolLookupResult, DomainError>;

    async fn lookup_by_siren(
        &self,
        siren: &str,
        document_type: &str,
    ) -> Result<PeppolLookupResult, DomainError> {
        self.lookup(PeppolScheme::Siren.code(), siren, document_type)
            .await
    }

    async fn lookup_by_siret(
        &self,
        siret: &str,
        document_type: &str,
    ) -> Result<PeppolLookupResult, DomainError> {
        self.lookup(PeppolScheme::Siret.code(), siret, document_type)
            .await
    }
}
