use serde::{Deserialize, Serialize};

use crate::peppol::PeppolEnvironment;

/// Settings of the authoritative test responder.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResponderConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Names ending in `.{wildcard_suffix}` are answered from the wildcard bucket
    #[serde(default = "default_wildcard_suffix")]
    pub wildcard_suffix: String,

    #[serde(default = "default_wildcard_address")]
    pub wildcard_address: String,

    /// Load the built-in example.com sample records
    #[serde(default = "default_true")]
    pub include_samples: bool,

    /// Zone under which `participants` are published
    #[serde(default = "default_sml_zone")]
    pub sml_zone: String,

    #[serde(default)]
    pub records: Vec<LocalRecordConfig>,

    #[serde(default)]
    pub participants: Vec<ParticipantRecordConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocalRecordConfig {
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: String,

    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Address for A/AAAA, target for CNAME, single string for TXT
    #[serde(default)]
    pub value: Option<String>,

    /// Character strings of a TXT record
    #[serde(default)]
    pub strings: Vec<String>,

    #[serde(default)]
    pub naptr: Option<NaptrRecordConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NaptrRecordConfig {
    pub order: u16,
    pub preference: u16,
    #[serde(default)]
    pub flags: String,
    #[serde(default)]
    pub services: String,
    #[serde(default)]
    pub regexp: String,
    #[serde(default)]
    pub replacement: String,
}

/// Publishes the SMP of a participant as a NAPTR record under `sml_zone`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParticipantRecordConfig {
    /// Scheme code (`0009`) or name (`SIREN`)
    pub scheme: String,
    pub id: String,
    pub smp_url: String,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            wildcard_suffix: default_wildcard_suffix(),
            wildcard_address: default_wildcard_address(),
            include_samples: true,
            sml_zone: default_sml_zone(),
            records: vec![],
            participants: vec![],
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5353
}

fn default_wildcard_suffix() -> String {
    "test".to_string()
}

fn default_wildcard_address() -> String {
    "192.168.1.100".to_string()
}

fn default_sml_zone() -> String {
    PeppolEnvironment::Test.zone().to_string()
}

fn default_ttl() -> u32 {
    300
}

fn default_true() -> bool {
    true
}
