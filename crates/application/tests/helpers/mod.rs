#![allow(dead_code)]

mod mocks;

pub use mocks::{
    MockParticipantLookup, MockSmlResolver, MockSmpClient, PublishedMessage, RecordingPublisher,
};

use pac_routing_domain::{InvoiceMessage, PeppolEndpoint};

pub const SMP_URL: &str = "http://smp.example.test";

pub fn endpoint(address: &str) -> PeppolEndpoint {
    PeppolEndpoint::new(address, "MIIC-test-certificate", "peppol-transport-as4-v2_0")
}

pub fn invoice(invoice_id: &str, recipient_siren: &str) -> InvoiceMessage {
    InvoiceMessage::new(
        invoice_id,
        "111222333",
        recipient_siren,
        "<Invoice/>",
    )
}
