use super::RouteInvoiceUseCase;
use crate::ports::StagePublisher;
use bytes::Bytes;
use pac_routing_domain::{DomainError, InvoiceMessage, RoutingResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// One message received on the routing stage's inbound subject.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub payload: Bytes,
    pub correlation_id: Option<String>,
}

impl InboundMessage {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            correlation_id: None,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

/// Routing stage of the pipeline: decode, route, publish the verdict on the
/// output or error subject with the inbound correlation id.
pub struct ProcessRoutingMessageUseCase {
    route: Arc<RouteInvoiceUseCase>,
    publisher: Arc<dyn StagePublisher>,
    subject_out: String,
    subject_err: String,
}

impl ProcessRoutingMessageUseCase {
    pub fn new(
        route: Arc<RouteInvoiceUseCase>,
        publisher: Arc<dyn StagePublisher>,
        subject_out: impl Into<String>,
        subject_err: impl Into<String>,
    ) -> Self {
        Self {
            route,
            publisher,
            subject_out: subject_out.into(),
            subject_err: subject_err.into(),
        }
    }

    pub async fn execute(&self, inbound: InboundMessage) -> Result<RoutingResult, DomainError> {
        let result = match serde_json::from_slice::<InvoiceMessage>(&inbound.payload) {
            Ok(message) if message.local_recipient => {
                debug!(invoice_id = %message.invoice_id, "Local recipient, skipping discovery");
                RoutingResult::delivered(&message.invoice_id)
            }
            Ok(message) => self.route.execute(&message).await,
            Err(e) => {
                let invoice_id = extract_invoice_id(&inbound.payload);
                let error = DomainError::InvalidInvoiceMessage(e.to_string());
                warn!(invoice_id = %invoice_id, error = %error, "Undecodable invoice message");
                RoutingResult::internal_error(invoice_id, error.to_string())
            }
        };

        let subject = if result.is_error() {
            &self.subject_err
        } else {
            &self.subject_out
        };

        let body = serde_json::to_vec(&result).map_err(|e| DomainError::PublishFailed {
            subject: subject.clone(),
            reason: e.to_string(),
        })?;

        self.publisher
            .publish(subject, Bytes::from(body), inbound.correlation_id.as_deref())
            .await?;

        debug!(
            invoice_id = %result.invoice_id,
            status = %result.status,
            subject = %subject,
            "Routing verdict published"
        );

        Ok(result)
    }
}

fn extract_invoice_id(payload: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(payload)
        .ok()
        .and_then(|v| {
            v.get("invoice_id")
                .and_then(|id| id.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "unknown".to_string())
}
