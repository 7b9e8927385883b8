mod helpers;

use helpers::{endpoint, invoice, MockParticipantLookup, RecordingPublisher};
use pac_routing_application::services::StubParticipantLookup;
use pac_routing_application::use_cases::{
    InboundMessage, ProcessRoutingMessageUseCase, RouteInvoiceUseCase,
};
use pac_routing_domain::config::PipelineConfig;
use pac_routing_domain::{ErrorCode, InvoiceMessage, PeppolLookupResult, RoutingStatus};
use std::sync::Arc;

struct Stage {
    use_case: ProcessRoutingMessageUseCase,
    publisher: Arc<RecordingPublisher>,
    lookup: Arc<MockParticipantLookup>,
}

fn stage_with(result: PeppolLookupResult) -> Stage {
    let config = PipelineConfig::default();
    let lookup = Arc::new(MockParticipantLookup::answering(result));
    let publisher = Arc::new(RecordingPublisher::new());
    let route = Arc::new(RouteInvoiceUseCase::new(lookup.clone()));
    let use_case = ProcessRoutingMessageUseCase::new(
        route,
        publisher.clone(),
        config.subject_out(),
        config.subject_err(),
    );
    Stage {
        use_case,
        publisher,
        lookup,
    }
}

fn encode(message: &InvoiceMessage) -> Vec<u8> {
    serde_json::to_vec(message).unwrap()
}

#[tokio::test]
async fn test_routed_verdict_published_on_out_subject_with_correlation_id() {
    let stage = stage_with(PeppolLookupResult::found(
        endpoint("https://ap.example.com"),
        None,
    ));
    let inbound = InboundMessage::new(encode(&invoice("INV-100", "123456789")))
        .with_correlation_id("corr-42");

    let result = stage.use_case.execute(inbound).await.unwrap();

    assert_eq!(result.status, RoutingStatus::Routed);
    let published = stage.publisher.messages();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].subject, "routage-OUT");
    assert_eq!(published[0].correlation_id.as_deref(), Some("corr-42"));
    let body = published[0].json();
    assert_eq!(body["invoice_id"], "INV-100");
    assert_eq!(body["status"], "routed");
    assert_eq!(body["destination"], "https://ap.example.com");
}

#[tokio::test]
async fn test_error_verdict_published_on_err_subject() {
    let stage = stage_with(PeppolLookupResult::failed_with_default(
        ErrorCode::SmpUnavailable,
        None,
    ));
    let inbound = InboundMessage::new(encode(&invoice("INV-101", "123456789")));

    let result = stage.use_case.execute(inbound).await.unwrap();

    assert!(result.is_error());
    let published = stage.publisher.messages();
    assert_eq!(published[0].subject, "routage-ERR");
    assert_eq!(published[0].correlation_id, None);
    assert_eq!(published[0].json()["error_code"], "SMP_UNAVAILABLE");
}

#[tokio::test]
async fn test_ppf_fallback_is_not_an_error() {
    let stage = stage_with(PeppolLookupResult::failed_with_default(
        ErrorCode::ParticipantNotFound,
        None,
    ));
    let inbound = InboundMessage::new(encode(&invoice("INV-102", "123456789")));

    let result = stage.use_case.execute(inbound).await.unwrap();

    assert_eq!(result.status, RoutingStatus::RoutedToPpf);
    assert_eq!(stage.publisher.messages()[0].subject, "routage-OUT");
    assert_eq!(stage.publisher.messages()[0].json()["status"], "routed_to_ppf");
}

#[tokio::test]
async fn test_local_recipient_is_delivered_without_lookup() {
    let stage = stage_with(PeppolLookupResult::failed_with_default(
        ErrorCode::SmpError,
        None,
    ));
    let message = invoice("INV-103", "123456789").with_local_recipient(true);

    let result = stage
        .use_case
        .execute(InboundMessage::new(encode(&message)))
        .await
        .unwrap();

    assert_eq!(result.status, RoutingStatus::Delivered);
    assert_eq!(stage.lookup.calls(), 0);
    assert_eq!(stage.publisher.messages()[0].subject, "routage-OUT");
}

#[tokio::test]
async fn test_undecodable_payload_is_internal_error_with_unknown_id() {
    let stage = stage_with(PeppolLookupResult::failed_with_default(
        ErrorCode::SmpError,
        None,
    ));

    let result = stage
        .use_case
        .execute(InboundMessage::new(&b"not json"[..]).with_correlation_id("corr-7"))
        .await
        .unwrap();

    assert_eq!(result.invoice_id, "unknown");
    assert_eq!(result.error_code, Some(ErrorCode::InternalError));
    assert!(result
        .error_message
        .as_deref()
        .is_some_and(|m| m.starts_with("Invalid invoice message: ")));
    let published = stage.publisher.messages();
    assert_eq!(published[0].subject, "routage-ERR");
    assert_eq!(published[0].correlation_id.as_deref(), Some("corr-7"));
    assert_eq!(stage.lookup.calls(), 0);
}

#[tokio::test]
async fn test_incomplete_payload_keeps_invoice_id() {
    let stage = stage_with(PeppolLookupResult::failed_with_default(
        ErrorCode::SmpError,
        None,
    ));

    let result = stage
        .use_case
        .execute(InboundMessage::new(&br#"{"invoice_id":"INV-104"}"#[..]))
        .await
        .unwrap();

    assert_eq!(result.invoice_id, "INV-104");
    assert_eq!(result.error_code, Some(ErrorCode::InternalError));
}

#[tokio::test]
async fn test_publish_failure_is_returned() {
    let stage = stage_with(PeppolLookupResult::found(
        endpoint("https://ap.example.com"),
        None,
    ));
    stage.publisher.set_should_fail(true);

    let outcome = stage
        .use_case
        .execute(InboundMessage::new(encode(&invoice("INV-105", "123456789"))))
        .await;

    assert!(outcome.is_err());
}

#[tokio::test]
async fn test_custom_prefix_subjects() {
    let lookup = Arc::new(StubParticipantLookup::new());
    let publisher = Arc::new(RecordingPublisher::new());
    let config = PipelineConfig {
        prefix: "routing".to_string(),
        ..PipelineConfig::default()
    };
    let use_case = ProcessRoutingMessageUseCase::new(
        Arc::new(RouteInvoiceUseCase::new(lookup)),
        publisher.clone(),
        config.subject_out(),
        config.subject_err(),
    );

    use_case
        .execute(InboundMessage::new(encode(&invoice("INV-106", "123456789"))))
        .await
        .unwrap();

    assert_eq!(publisher.messages()[0].subject, "routing-OUT");
}
