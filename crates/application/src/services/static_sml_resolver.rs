use crate::ports::SmlResolver;
use async_trait::async_trait;
use pac_routing_domain::{compute_sml_hostname, DomainError};
use std::collections::HashMap;

/// SML double answering from a fixed hostname → SMP URL table.
#[derive(Debug, Clone, Default)]
pub struct StaticSmlResolver {
    entries: HashMap<String, String>,
}

impl StaticSmlResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hostname(mut self, hostname: &str, smp_url: impl Into<String>) -> Self {
        self.entries
            .insert(hostname.to_ascii_lowercase(), smp_url.into());
        self
    }

    /// Registers the SMP of a participant under `sml_zone`.
    pub fn with_participant(
        self,
        sml_zone: &str,
        scheme_id: &str,
        participant_id: &str,
        smp_url: impl Into<String>,
    ) -> Self {
        let hostname = compute_sml_hostname(sml_zone, scheme_id, participant_id);
        self.with_hostname(&hostname, smp_url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SmlResolver for StaticSmlResolver {
    async fn resolve_smp_url(&self, hostname: &str) -> Result<Option<String>, DomainError> {
        Ok(self
            .entries
            .get(&hostname.trim_end_matches('.').to_ascii_lowercase())
            .cloned())
    }
}
