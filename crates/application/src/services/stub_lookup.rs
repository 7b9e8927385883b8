use crate::ports::ParticipantLookup;
use async_trait::async_trait;
use pac_routing_domain::{DomainError, ErrorCode, PeppolEndpoint, PeppolLookupResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

#[derive(Debug, Clone)]
struct StubEntry {
    smp_url: Option<String>,
    endpoint: Option<PeppolEndpoint>,
    error_code: Option<ErrorCode>,
}

/// Deterministic lookup answering from a table of canned responses.
///
/// Keys are the case-insensitive `"{scheme}::{participant}"`. Unregistered
/// participants go to the optional fallback lookup, or are reported as
/// PARTICIPANT_NOT_FOUND.
pub struct StubParticipantLookup {
    responses: RwLock<HashMap<String, StubEntry>>,
    fallback: Option<Arc<dyn ParticipantLookup>>,
}

impl StubParticipantLookup {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            fallback: None,
        }
    }

    pub fn with_fallback(fallback: Arc<dyn ParticipantLookup>) -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            fallback: Some(fallback),
        }
    }

    fn key(scheme_id: &str, participant_id: &str) -> String {
        format!("{}::{}", scheme_id, participant_id).to_lowercase()
    }

    /// Registers a canned response. An `error_code` wins over an endpoint;
    /// with neither the participant is reported as not supporting the
    /// requested document type.
    pub fn set_mock_response(
        &self,
        scheme_id: &str,
        participant_id: &str,
        smp_url: Option<&str>,
        endpoint: Option<PeppolEndpoint>,
        error_code: Option<ErrorCode>,
    ) -> Result<(), DomainError> {
        let entry = StubEntry {
            smp_url: smp_url.map(str::to_string),
            endpoint,
            error_code,
        };
        self.responses
            .write()
            .map_err(|_| DomainError::LookupFailed("stub table lock poisoned".to_string()))?
            .insert(Self::key(scheme_id, participant_id), entry);
        Ok(())
    }

    pub fn set_endpoint(
        &self,
        scheme_id: &str,
        participant_id: &str,
        endpoint: PeppolEndpoint,
    ) -> Result<(), DomainError> {
        self.set_mock_response(scheme_id, participant_id, None, Some(endpoint), None)
    }

    pub fn set_error(
        &self,
        scheme_id: &str,
        participant_id: &str,
        error_code: ErrorCode,
    ) -> Result<(), DomainError> {
        self.set_mock_response(scheme_id, participant_id, None, None, Some(error_code))
    }

    pub fn clear_mock_responses(&self) -> Result<(), DomainError> {
        self.responses
            .write()
            .map_err(|_| DomainError::LookupFailed("stub table lock poisoned".to_string()))?
            .clear();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.responses.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, key: &str) -> Result<Option<StubEntry>, DomainError> {
        let responses = self
            .responses
            .read()
            .map_err(|_| DomainError::LookupFailed("stub table lock poisoned".to_string()))?;
        Ok(responses.get(key).cloned())
    }
}

impl Default for StubParticipantLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ParticipantLookup for StubParticipantLookup {
    async fn lookup(
        &self,
        scheme_id: &str,
        participant_id: &str,
        document_type: &str,
    ) -> Result<PeppolLookupResult, DomainError> {
        let key = Self::key(scheme_id, participant_id);

        let Some(entry) = self.entry(&key)? else {
            if let Some(fallback) = &self.fallback {
                return fallback
                    .lookup(scheme_id, participant_id, document_type)
                    .await;
            }
            return Ok(PeppolLookupResult::failed(
                ErrorCode::ParticipantNotFound,
                format!(
                    "Participant {}::{} not found in the SML",
                    scheme_id, participant_id
                ),
                None,
            ));
        };

        debug!(key = %key, "Answering lookup from stub table");

        let result = match (entry.error_code, entry.endpoint) {
            (Some(code), _) => PeppolLookupResult::failed_with_default(code, entry.smp_url),
            (None, Some(endpoint)) => PeppolLookupResult::found(endpoint, entry.smp_url),
            (None, None) => PeppolLookupResult::failed(
                ErrorCode::DocumentTypeNotSupported,
                format!(
                    "Participant does not support document type {}",
                    document_type
                ),
                entry.smp_url,
            ),
        };

        Ok(result)
    }
}
