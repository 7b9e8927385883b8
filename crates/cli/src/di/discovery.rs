use anyhow::Context;
use pac_routing_application::ports::ParticipantLookup;
use pac_routing_application::services::{NetworkParticipantLookup, StubParticipantLookup};
use pac_routing_domain::config::{DiscoveryConfig, DiscoveryMode};
use pac_routing_domain::PeppolScheme;
use pac_routing_infrastructure::discovery::HttpSmpClient;
use pac_routing_infrastructure::dns::WireSmlResolver;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub fn build_lookup(config: &DiscoveryConfig) -> anyhow::Result<Arc<dyn ParticipantLookup>> {
    match config.mode {
        DiscoveryMode::Network => {
            let nameserver: SocketAddr = config
                .nameserver
                .parse()
                .with_context(|| format!("Invalid nameserver '{}'", config.nameserver))?;

            let sml = Arc::new(WireSmlResolver::new(
                nameserver,
                Duration::from_secs(config.dns_timeout_secs),
            ));
            let smp = Arc::new(HttpSmpClient::new(Duration::from_secs(
                config.http_timeout_secs,
            )));

            info!(
                environment = ?config.environment,
                zone = config.environment.zone(),
                nameserver = %nameserver,
                "Network discovery enabled"
            );
            Ok(Arc::new(NetworkParticipantLookup::new(
                config.environment,
                sml,
                smp,
            )))
        }
        DiscoveryMode::Stub => {
            let stub = StubParticipantLookup::new();
            for entry in &config.stubs {
                stub.set_mock_response(
                    &scheme_code(&entry.scheme),
                    &entry.id,
                    entry.smp_url.as_deref(),
                    entry.endpoint.clone(),
                    entry.error_code,
                )?;
            }

            info!(entries = stub.len(), "Stub discovery enabled");
            Ok(Arc::new(stub))
        }
    }
}

/// Scheme names are mapped to their codes; anything else is used verbatim.
pub fn scheme_code(scheme: &str) -> String {
    PeppolScheme::from_str(scheme)
        .map(|s| s.code().to_string())
        .unwrap_or_else(|_| scheme.to_string())
}
