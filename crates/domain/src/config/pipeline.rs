use serde::{Deserialize, Serialize};

use crate::routing::PPF_API_URL;

/// Message-bus settings of the routing stage.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default = "default_nats_url")]
    pub nats_url: String,

    /// Subjects are `{prefix}-IN`, `{prefix}-OUT` and `{prefix}-ERR`
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default = "default_queue")]
    pub queue: String,

    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl PipelineConfig {
    pub fn subject_in(&self) -> String {
        format!("{}-IN", self.prefix)
    }

    pub fn subject_out(&self) -> String {
        format!("{}-OUT", self.prefix)
    }

    pub fn subject_err(&self) -> String {
        format!("{}-ERR", self.prefix)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            nats_url: default_nats_url(),
            prefix: default_prefix(),
            queue: default_queue(),
            fallback_url: default_fallback_url(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_nats_url() -> String {
    std::env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string())
}

fn default_prefix() -> String {
    "routage".to_string()
}

fn default_queue() -> String {
    "q".to_string()
}

fn default_fallback_url() -> String {
    PPF_API_URL.to_string()
}

fn default_connect_timeout() -> u64 {
    5
}
