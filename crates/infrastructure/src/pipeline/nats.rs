use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use pac_routing_application::ports::StagePublisher;
use pac_routing_application::use_cases::{InboundMessage, ProcessRoutingMessageUseCase};
use pac_routing_domain::config::PipelineConfig;
use pac_routing_domain::DomainError;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const CORRELATION_ID_HEADER: &str = "correlation_id";
pub const HEALTHCHECK_SUBJECT: &str = "healthcheck";
pub const HEALTHCHECK_REPLY_SUBJECT: &str = "healthcheck_resp";
pub const HEALTHCHECK_REPLY: &str = "I am alive !";

pub async fn connect(config: &PipelineConfig) -> Result<async_nats::Client, DomainError> {
    info!(url = %config.nats_url, "Connecting to NATS");

    let client = async_nats::ConnectOptions::new()
        .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect(config.nats_url.as_str())
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to connect to NATS: {}", e)))?;

    info!(url = %config.nats_url, "Connected to NATS");
    Ok(client)
}

pub struct NatsStagePublisher {
    client: async_nats::Client,
}

impl NatsStagePublisher {
    pub fn new(client: async_nats::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StagePublisher for NatsStagePublisher {
    async fn publish(
        &self,
        subject: &str,
        payload: Bytes,
        correlation_id: Option<&str>,
    ) -> Result<(), DomainError> {
        let result = match correlation_id {
            Some(id) => {
                let mut headers = async_nats::HeaderMap::new();
                headers.insert(CORRELATION_ID_HEADER, id);
                self.client
                    .publish_with_headers(subject.to_string(), headers, payload)
                    .await
            }
            None => self.client.publish(subject.to_string(), payload).await,
        };

        result.map_err(|e| DomainError::PublishFailed {
            subject: subject.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Consumes `{prefix}-IN` in a queue group and answers healthchecks until
/// cancelled.
pub struct RoutingStage {
    client: async_nats::Client,
    use_case: Arc<ProcessRoutingMessageUseCase>,
    subject_in: String,
    queue: String,
}

impl RoutingStage {
    pub fn new(
        client: async_nats::Client,
        use_case: Arc<ProcessRoutingMessageUseCase>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            client,
            use_case,
            subject_in: config.subject_in(),
            queue: config.queue.clone(),
        }
    }

    pub async fn run(&self, ctx: CancellationToken) -> Result<(), DomainError> {
        let mut inbound = self
            .client
            .queue_subscribe(self.subject_in.clone(), self.queue.clone())
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to subscribe: {}", e)))?;
        let mut healthcheck = self
            .client
            .subscribe(HEALTHCHECK_SUBJECT)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to subscribe: {}", e)))?;

        info!(subject = %self.subject_in, queue = %self.queue, "Routing stage started");

        let mut workers = RoutingWorkers::new(self.use_case.clone());

        loop {
            tokio::select! {
                _ = ctx.cancelled() => {
                    info!("Received shutdown signal, stopping routing stage");
                    break;
                }
                message = inbound.next() => {
                    let Some(message) = message else {
                        warn!("Inbound subscription closed");
                        break;
                    };
                    workers.spawn(inbound_message(message));
                }
                ping = healthcheck.next() => {
                    if ping.is_none() {
                        warn!("Healthcheck subscription closed");
                        break;
                    }
                    if let Err(e) = self
                        .client
                        .publish(HEALTHCHECK_REPLY_SUBJECT, Bytes::from_static(HEALTHCHECK_REPLY.as_bytes()))
                        .await
                    {
                        error!(error = %e, "Failed to answer healthcheck");
                    }
                }
            }
        }

        // Messages are not redelivered: publish and flush every verdict
        // still in flight before returning.
        workers.drain().await;
        if let Err(e) = self.client.flush().await {
            error!(error = %e, "Failed to flush NATS connection");
        }

        info!("Routing stage stopped");
        Ok(())
    }
}

fn inbound_message(message: async_nats::Message) -> InboundMessage {
    let correlation_id = message
        .headers
        .as_ref()
        .and_then(|h| h.get(CORRELATION_ID_HEADER))
        .map(|v| v.as_str().to_string());

    let inbound = InboundMessage::new(message.payload);
    match correlation_id {
        Some(id) => inbound.with_correlation_id(id),
        None => inbound,
    }
}

/// Per-invoice routing tasks of a stage.
///
/// Finished tasks are reaped on every spawn; [`RoutingWorkers::drain`]
/// waits for the remaining ones.
pub struct RoutingWorkers {
    use_case: Arc<ProcessRoutingMessageUseCase>,
    tasks: JoinSet<()>,
}

impl RoutingWorkers {
    pub fn new(use_case: Arc<ProcessRoutingMessageUseCase>) -> Self {
        Self {
            use_case,
            tasks: JoinSet::new(),
        }
    }

    pub fn spawn(&mut self, inbound: InboundMessage) {
        while let Some(finished) = self.tasks.try_join_next() {
            log_join_error(finished);
        }

        let use_case = self.use_case.clone();
        self.tasks.spawn(async move {
            match use_case.execute(inbound).await {
                Ok(result) => debug!(
                    invoice_id = %result.invoice_id,
                    status = %result.status,
                    "Invoice processed"
                ),
                Err(e) => error!(error = %e, "Failed to publish routing verdict"),
            }
        });
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for every spawned task to publish its verdict.
    pub async fn drain(&mut self) {
        if !self.tasks.is_empty() {
            info!(in_flight = self.tasks.len(), "Waiting for in-flight invoices");
        }
        while let Some(finished) = self.tasks.join_next().await {
            log_join_error(finished);
        }
    }
}

fn log_join_error(finished: Result<(), tokio::task::JoinError>) {
    if let Err(e) = finished {
        error!(error = %e, "Routing task failed");
    }
}
