use pac_routing_application::ports::{SmpClient, SmpError};
use pac_routing_domain::resolve_document_type;
use pac_routing_infrastructure::discovery::HttpSmpClient;
use std::time::Duration;

mod helpers;
use helpers::{MockSmp, SmpBehavior, SMP_NAMESPACE_METADATA};

fn client() -> HttpSmpClient {
    HttpSmpClient::new(Duration::from_secs(2))
}

#[tokio::test]
async fn test_fetches_as4_endpoint() {
    let smp = MockSmp::start(SmpBehavior::Metadata(SMP_NAMESPACE_METADATA.into())).await;

    let endpoint = client()
        .fetch_endpoint(smp.url(), "0009", "123456789", "doc")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(endpoint.address, "https://ap.example.test/as4");
    assert_eq!(endpoint.certificate, "MIIC-integration-cert");
    assert_eq!(endpoint.transport_profile, "peppol-transport-as4-v2_0");
    assert_eq!(
        endpoint.service_description.as_deref(),
        Some("Integration access point")
    );
}

#[tokio::test]
async fn test_request_path_encodes_document_type() {
    let smp = MockSmp::start(SmpBehavior::Metadata(SMP_NAMESPACE_METADATA.into())).await;
    let document_type = resolve_document_type("invoice_ubl");

    client()
        .fetch_endpoint(smp.url(), "0009", "123456789", document_type)
        .await
        .unwrap();

    let paths = smp.requested_paths();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].starts_with("/iso6523-actorid-upis::0009::123456789/services/"));
    assert!(paths[0].contains("busdox-docid-qns%3A%3Aurn%3Aoasis"));
    assert!(!paths[0].contains('#'));
}

#[tokio::test]
async fn test_metadata_without_as4_endpoint_is_none() {
    let xml = SMP_NAMESPACE_METADATA.replace("peppol-transport-as4-v2_0", "busdox-transport-start");
    let smp = MockSmp::start(SmpBehavior::Metadata(xml)).await;

    let endpoint = client()
        .fetch_endpoint(smp.url(), "0009", "123456789", "doc")
        .await
        .unwrap();

    assert!(endpoint.is_none());
}

#[tokio::test]
async fn test_malformed_body_is_none() {
    let smp = MockSmp::start(SmpBehavior::Metadata("<not-xml".into())).await;

    let endpoint = client()
        .fetch_endpoint(smp.url(), "0009", "123456789", "doc")
        .await
        .unwrap();

    assert!(endpoint.is_none());
}

#[tokio::test]
async fn test_error_statuses_are_reported() {
    for status in [404u16, 500, 503] {
        let smp = MockSmp::start(SmpBehavior::Status(status)).await;

        let result = client()
            .fetch_endpoint(smp.url(), "0009", "123456789", "doc")
            .await;

        assert_eq!(result, Err(SmpError::Status(status)));
    }
}

#[tokio::test]
async fn test_slow_smp_times_out() {
    let smp = MockSmp::start(SmpBehavior::Delay(Duration::from_secs(3))).await;
    let client = HttpSmpClient::new(Duration::from_millis(200));

    let result = client
        .fetch_endpoint(smp.url(), "0009", "123456789", "doc")
        .await;

    assert_eq!(result, Err(SmpError::Timeout));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let result = client().fetch_endpoint(&url, "0009", "1", "doc").await;

    assert!(matches!(result, Err(SmpError::Transport(_))));
}
