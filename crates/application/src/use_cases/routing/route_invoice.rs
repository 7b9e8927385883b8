use crate::ports::ParticipantLookup;
use futures::FutureExt;
use pac_routing_domain::{
    DomainError, ErrorCode, InvoiceMessage, PeppolScheme, RoutingResult, PPF_API_URL,
};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Turns the discovery outcome for an invoice's recipient into a verdict.
///
/// Stateless per call. Every failure, including a panic inside the lookup,
/// comes back as a `RoutingResult`.
pub struct RouteInvoiceUseCase {
    lookup: Arc<dyn ParticipantLookup>,
    fallback_url: String,
}

impl RouteInvoiceUseCase {
    pub fn new(lookup: Arc<dyn ParticipantLookup>) -> Self {
        Self {
            lookup,
            fallback_url: PPF_API_URL.to_string(),
        }
    }

    pub fn with_fallback_url(mut self, fallback_url: impl Into<String>) -> Self {
        self.fallback_url = fallback_url.into();
        self
    }

    pub fn fallback_url(&self) -> &str {
        &self.fallback_url
    }

    pub async fn execute(&self, message: &InvoiceMessage) -> RoutingResult {
        let outcome = AssertUnwindSafe(self.route(message)).catch_unwind().await;

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                error!(invoice_id = %message.invoice_id, error = %e, "Routing failed");
                RoutingResult::internal_error(&message.invoice_id, e.to_string())
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                error!(invoice_id = %message.invoice_id, reason = %reason, "Routing panicked");
                RoutingResult::internal_error(&message.invoice_id, reason)
            }
        }
    }

    async fn route(&self, message: &InvoiceMessage) -> Result<RoutingResult, DomainError> {
        let (scheme, participant_id) = match message.recipient_siret.as_deref() {
            Some(siret) if !siret.is_empty() => (PeppolScheme::Siret, siret),
            _ => (PeppolScheme::Siren, message.recipient_siren.as_str()),
        };

        debug!(
            invoice_id = %message.invoice_id,
            scheme = scheme.code(),
            participant = participant_id,
            "Looking up recipient"
        );

        let lookup = self
            .lookup
            .lookup(scheme.code(), participant_id, &message.document_type)
            .await?;

        if lookup.success {
            if let Some(endpoint) = lookup.endpoint {
                info!(
                    invoice_id = %message.invoice_id,
                    destination = %endpoint.address,
                    "Invoice routed to PEPPOL access point"
                );
                return Ok(RoutingResult::routed(&message.invoice_id, endpoint.address));
            }
        }

        match lookup.error_code {
            Some(ErrorCode::ParticipantNotFound) => {
                info!(
                    invoice_id = %message.invoice_id,
                    destination = %self.fallback_url,
                    "Recipient not on PEPPOL, routing to PPF"
                );
                Ok(RoutingResult::routed_to_ppf(
                    &message.invoice_id,
                    &self.fallback_url,
                ))
            }
            Some(code) => Ok(RoutingResult::error(
                &message.invoice_id,
                code,
                lookup.error_message,
                true,
            )),
            None => Err(DomainError::LookupFailed(format!(
                "lookup for {}::{} returned neither endpoint nor error code",
                scheme.code(),
                participant_id
            ))),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "routing panicked".to_string()
    }
}
