use crate::ports::{ParticipantLookup, SmlResolver, SmpClient, SmpError};
use async_trait::async_trait;
use pac_routing_domain::{
    compute_sml_hostname, resolve_document_type, DomainError, ErrorCode, PeppolEnvironment,
    PeppolLookupResult,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Discovery over the network: SML hostname, DNS resolution of the SMP,
/// then the SMP metadata request.
pub struct NetworkParticipantLookup {
    sml_zone: String,
    sml: Arc<dyn SmlResolver>,
    smp: Arc<dyn SmpClient>,
}

impl NetworkParticipantLookup {
    pub fn new(
        environment: PeppolEnvironment,
        sml: Arc<dyn SmlResolver>,
        smp: Arc<dyn SmpClient>,
    ) -> Self {
        Self::with_zone(environment.zone(), sml, smp)
    }

    pub fn with_zone(
        sml_zone: impl Into<String>,
        sml: Arc<dyn SmlResolver>,
        smp: Arc<dyn SmpClient>,
    ) -> Self {
        Self {
            sml_zone: sml_zone.into(),
            sml,
            smp,
        }
    }

    pub fn sml_zone(&self) -> &str {
        &self.sml_zone
    }
}

#[async_trait]
impl ParticipantLookup for NetworkParticipantLookup {
    async fn lookup(
        &self,
        scheme_id: &str,
        participant_id: &str,
        document_type: &str,
    ) -> Result<PeppolLookupResult, DomainError> {
        let document_type_id = resolve_document_type(document_type);
        let hostname = compute_sml_hostname(&self.sml_zone, scheme_id, participant_id);

        debug!(
            scheme = scheme_id,
            participant = participant_id,
            hostname = %hostname,
            "Resolving participant in SML"
        );

        let smp_url = match self.sml.resolve_smp_url(&hostname).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                return Ok(PeppolLookupResult::failed(
                    ErrorCode::ParticipantNotFound,
                    format!(
                        "Participant {}::{} not found in the SML",
                        scheme_id, participant_id
                    ),
                    None,
                ));
            }
            Err(e) => {
                warn!(hostname = %hostname, error = %e, "SML resolution failed");
                return Ok(PeppolLookupResult::failed(
                    ErrorCode::ParticipantNotFound,
                    format!(
                        "Participant {}::{} not found in the SML ({})",
                        scheme_id, participant_id, e
                    ),
                    None,
                ));
            }
        };

        debug!(hostname = %hostname, smp_url = %smp_url, "SMP located");

        let result = match self
            .smp
            .fetch_endpoint(&smp_url, scheme_id, participant_id, document_type_id)
            .await
        {
            Ok(Some(endpoint)) => PeppolLookupResult::found(endpoint, Some(smp_url)),
            Ok(None) | Err(SmpError::Status(404)) => PeppolLookupResult::failed(
                ErrorCode::DocumentTypeNotSupported,
                format!(
                    "Participant does not support document type {}",
                    document_type
                ),
                Some(smp_url),
            ),
            Err(SmpError::Timeout) => {
                PeppolLookupResult::failed_with_default(ErrorCode::SmpTimeout, Some(smp_url))
            }
            Err(SmpError::Status(503)) => {
                PeppolLookupResult::failed_with_default(ErrorCode::SmpUnavailable, Some(smp_url))
            }
            Err(SmpError::Status(status)) => PeppolLookupResult::failed(
                ErrorCode::SmpError,
                format!("SMP error: {}", status),
                Some(smp_url),
            ),
            Err(SmpError::Transport(reason)) => {
                PeppolLookupResult::failed(ErrorCode::SmpError, reason, Some(smp_url))
            }
        };

        if let Some(code) = result.error_code {
            debug!(
                scheme = scheme_id,
                participant = participant_id,
                error_code = %code,
                "Participant lookup failed"
            );
        }

        Ok(result)
    }
}
