use serde::{Deserialize, Serialize};

use crate::lookup::{ErrorCode, PeppolEndpoint};
use crate::peppol::PeppolEnvironment;

/// Which lookup implementation is wired at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMode {
    /// SML over DNS, then SMP over HTTP
    #[default]
    Network,
    /// Canned answers from `stubs`, no network access
    Stub,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    #[serde(default)]
    pub environment: PeppolEnvironment,

    #[serde(default)]
    pub mode: DiscoveryMode,

    /// Nameserver queried for NAPTR/CNAME records (`ip:port`)
    #[serde(default = "default_nameserver")]
    pub nameserver: String,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default = "default_dns_timeout")]
    pub dns_timeout_secs: u64,

    #[serde(default)]
    pub stubs: Vec<StubResponseConfig>,
}

/// One canned discovery answer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StubResponseConfig {
    /// Scheme code (`0009`) or name (`SIREN`)
    pub scheme: String,
    pub id: String,
    #[serde(default)]
    pub smp_url: Option<String>,
    #[serde(default)]
    pub error_code: Option<ErrorCode>,
    #[serde(default)]
    pub endpoint: Option<PeppolEndpoint>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            environment: PeppolEnvironment::default(),
            mode: DiscoveryMode::default(),
            nameserver: default_nameserver(),
            http_timeout_secs: default_http_timeout(),
            dns_timeout_secs: default_dns_timeout(),
            stubs: vec![],
        }
    }
}

fn default_nameserver() -> String {
    "8.8.8.8:53".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

fn default_dns_timeout() -> u64 {
    5
}
