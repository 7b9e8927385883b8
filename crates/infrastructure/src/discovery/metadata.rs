use pac_routing_domain::{PeppolEndpoint, AS4_TRANSPORT_PROFILE};
use roxmltree::{Document, Node};
use tracing::debug;

pub const SMP_NAMESPACE: &str = "http://busdox.org/serviceMetadata/publishing/1.0/";

/// Extracts the AS4 endpoint from a `SignedServiceMetadata` document.
///
/// Returns `None` for malformed XML, for documents without an AS4 endpoint
/// and for endpoints missing their address or certificate.
pub fn parse_service_metadata(xml: &str) -> Option<PeppolEndpoint> {
    let doc = match Document::parse(xml) {
        Ok(doc) => doc,
        Err(e) => {
            debug!(error = %e, "SMP response is not well-formed XML");
            return None;
        }
    };

    let endpoint = doc
        .descendants()
        .find(|n| n.has_tag_name((SMP_NAMESPACE, "Endpoint")) && is_as4(n))
        .or_else(|| {
            doc.descendants()
                .find(|n| n.is_element() && n.tag_name().name().contains("Endpoint") && is_as4(n))
        })?;

    let address = child_text(&endpoint, "Address")?;
    let certificate = child_text(&endpoint, "Certificate")?;

    let mut result = PeppolEndpoint::new(address, certificate, AS4_TRANSPORT_PROFILE);
    if let Some(description) = child_text(&endpoint, "ServiceDescription") {
        result = result.with_service_description(description);
    }
    if let Some(url) = child_text(&endpoint, "TechnicalContactUrl") {
        result = result.with_technical_contact_url(url);
    }
    Some(result)
}

fn is_as4(node: &Node) -> bool {
    node.attribute("transportProfile") == Some(AS4_TRANSPORT_PROFILE)
}

/// Trimmed text of the first descendant named `local_name`, any namespace.
fn child_text(node: &Node, local_name: &str) -> Option<String> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == local_name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
