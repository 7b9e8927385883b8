use async_trait::async_trait;
use bytes::Bytes;
use pac_routing_application::ports::{ParticipantLookup, StagePublisher};
use pac_routing_application::use_cases::{
    InboundMessage, ProcessRoutingMessageUseCase, RouteInvoiceUseCase,
};
use pac_routing_domain::config::PipelineConfig;
use pac_routing_domain::{DomainError, ErrorCode, InvoiceMessage, PeppolLookupResult};
use pac_routing_infrastructure::pipeline::RoutingWorkers;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Lookup that answers PARTICIPANT_NOT_FOUND after a delay.
struct SlowLookup {
    delay: Duration,
}

#[async_trait]
impl ParticipantLookup for SlowLookup {
    async fn lookup(
        &self,
        _scheme_id: &str,
        _participant_id: &str,
        _document_type: &str,
    ) -> Result<PeppolLookupResult, DomainError> {
        tokio::time::sleep(self.delay).await;
        Ok(PeppolLookupResult::failed_with_default(
            ErrorCode::ParticipantNotFound,
            None,
        ))
    }
}

#[derive(Default)]
struct RecordingPublisher {
    published: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingPublisher {
    fn published(&self) -> Vec<(String, Option<String>)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl StagePublisher for RecordingPublisher {
    async fn publish(
        &self,
        subject: &str,
        _payload: Bytes,
        correlation_id: Option<&str>,
    ) -> Result<(), DomainError> {
        self.published
            .lock()
            .unwrap()
            .push((subject.to_string(), correlation_id.map(str::to_string)));
        Ok(())
    }
}

fn workers(delay: Duration) -> (RoutingWorkers, Arc<RecordingPublisher>) {
    let config = PipelineConfig::default();
    let publisher = Arc::new(RecordingPublisher::default());
    let route = Arc::new(RouteInvoiceUseCase::new(Arc::new(SlowLookup { delay })));
    let use_case = Arc::new(ProcessRoutingMessageUseCase::new(
        route,
        publisher.clone(),
        config.subject_out(),
        config.subject_err(),
    ));
    (RoutingWorkers::new(use_case), publisher)
}

fn inbound(invoice_id: &str) -> InboundMessage {
    let message = InvoiceMessage::new(invoice_id, "111111111", "222222222", "<Invoice/>");
    InboundMessage::new(serde_json::to_vec(&message).unwrap()).with_correlation_id(invoice_id)
}

#[tokio::test]
async fn test_drain_after_cancel_publishes_every_in_flight_verdict() {
    let (mut workers, publisher) = workers(Duration::from_millis(300));
    let ctx = CancellationToken::new();

    for id in ["INV-1", "INV-2", "INV-3"] {
        workers.spawn(inbound(id));
    }
    let cancel = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
    });

    ctx.cancelled().await;
    assert!(publisher.published().is_empty());
    assert_eq!(workers.in_flight(), 3);

    workers.drain().await;

    let published = publisher.published();
    assert_eq!(published.len(), 3);
    assert!(published.iter().all(|(subject, _)| subject == "routage-OUT"));
    let mut ids: Vec<_> = published.into_iter().filter_map(|(_, id)| id).collect();
    ids.sort();
    assert_eq!(ids, ["INV-1", "INV-2", "INV-3"]);
    assert_eq!(workers.in_flight(), 0);
}

#[tokio::test]
async fn test_finished_tasks_are_reaped_on_spawn() {
    let (mut workers, publisher) = workers(Duration::ZERO);

    workers.spawn(inbound("INV-10"));
    tokio::time::sleep(Duration::from_millis(100)).await;
    workers.spawn(inbound("INV-11"));

    assert_eq!(workers.in_flight(), 1);
    workers.drain().await;
    assert_eq!(publisher.published().len(), 2);
}
