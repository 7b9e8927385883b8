use super::metadata::parse_service_metadata;
use async_trait::async_trait;
use pac_routing_application::ports::{SmpClient, SmpError};
use pac_routing_domain::peppol::PARTICIPANT_ID_SCHEME;
use pac_routing_domain::PeppolEndpoint;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::time::Duration;
use tracing::debug;

/// Everything but RFC 3986 unreserved characters is escaped.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// `{smp}/iso6523-actorid-upis::{scheme}::{id}/services/{document type}`
/// with the document type identifier percent-encoded as one path segment.
pub fn service_metadata_url(
    smp_url: &str,
    scheme_id: &str,
    participant_id: &str,
    document_type_id: &str,
) -> String {
    format!(
        "{}/{}::{}::{}/services/{}",
        smp_url.trim_end_matches('/'),
        PARTICIPANT_ID_SCHEME,
        scheme_id,
        participant_id,
        utf8_percent_encode(document_type_id, PATH_SEGMENT)
    )
}

pub struct HttpSmpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpSmpClient {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, timeout }
    }
}

#[async_trait]
impl SmpClient for HttpSmpClient {
    async fn fetch_endpoint(
        &self,
        smp_url: &str,
        scheme_id: &str,
        participant_id: &str,
        document_type_id: &str,
    ) -> Result<Option<PeppolEndpoint>, SmpError> {
        let url = service_metadata_url(smp_url, scheme_id, participant_id, document_type_id);
        debug!(url = %url, "Fetching SMP metadata");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/xml")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "SMP returned an error status");
            return Err(SmpError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(classify)?;
        let endpoint = parse_service_metadata(&body);
        if endpoint.is_none() {
            debug!(url = %url, "No usable AS4 endpoint in SMP metadata");
        }
        Ok(endpoint)
    }
}

fn classify(e: reqwest::Error) -> SmpError {
    if e.is_timeout() {
        SmpError::Timeout
    } else {
        SmpError::Transport(e.to_string())
    }
}
