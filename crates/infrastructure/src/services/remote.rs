use super::{ManagedService, ReadinessProbe, ServiceError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Service already running elsewhere; start only waits for readiness and
/// stop leaves it alone.
pub struct RemoteService {
    name: String,
    endpoint: String,
    host: String,
    port: u16,
    probe: ReadinessProbe,
    startup_timeout: Duration,
    started: bool,
}

impl RemoteService {
    /// `endpoint` must carry an explicit port unless its scheme has a known
    /// default (`http`, `https`).
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        probe: ReadinessProbe,
    ) -> Result<Self, ServiceError> {
        let endpoint = endpoint.into();
        let invalid = |reason: &str| ServiceError::InvalidEndpoint {
            endpoint: endpoint.clone(),
            reason: reason.to_string(),
        };

        let url = reqwest::Url::parse(&endpoint).map_err(|e| invalid(&e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| invalid("missing host"))?
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();
        let port = url
            .port_or_known_default()
            .ok_or_else(|| invalid("missing port"))?;

        Ok(Self {
            name: name.into(),
            endpoint,
            host,
            port,
            probe,
            startup_timeout: Duration::from_secs(30),
            started: false,
        })
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ManagedService for RemoteService {
    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    fn is_running(&mut self) -> bool {
        self.started
    }

    async fn start(&mut self) -> Result<(), ServiceError> {
        if !self.wait_ready(self.startup_timeout).await {
            return Err(ServiceError::NotReady {
                name: self.name.clone(),
                timeout_secs: self.startup_timeout.as_secs(),
            });
        }
        self.started = true;
        info!(service = %self.name, endpoint = %self.endpoint, "Using remote service");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ServiceError> {
        self.started = false;
        Ok(())
    }

    async fn wait_ready(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.probe.check(&self.host, self.port).await {
                return true;
            }
            if tokio::time::Instant::now() + POLL_INTERVAL > deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
