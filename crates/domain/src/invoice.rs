use serde::{Deserialize, Serialize};

use crate::peppol::DEFAULT_DOCUMENT_TYPE;

/// Invoice handed to the routing stage. Created once at ingestion and
/// passed by value; nothing downstream mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InvoiceMessage {
    pub invoice_id: String,
    pub sender_siren: String,
    #[serde(default)]
    pub sender_siret: Option<String>,
    pub recipient_siren: String,
    #[serde(default)]
    pub recipient_siret: Option<String>,
    #[serde(default = "default_document_type")]
    pub document_type: String,
    pub payload: String,
    #[serde(default)]
    pub local_recipient: bool,
}

fn default_document_type() -> String {
    DEFAULT_DOCUMENT_TYPE.to_string()
}

impl InvoiceMessage {
    pub fn new(
        invoice_id: impl Into<String>,
        sender_siren: impl Into<String>,
        recipient_siren: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            sender_siren: sender_siren.into(),
            sender_siret: None,
            recipient_siren: recipient_siren.into(),
            recipient_siret: None,
            document_type: default_document_type(),
            payload: payload.into(),
            local_recipient: false,
        }
    }

    pub fn with_sender_siret(mut self, siret: impl Into<String>) -> Self {
        self.sender_siret = Some(siret.into());
        self
    }

    pub fn with_recipient_siret(mut self, siret: impl Into<String>) -> Self {
        self.recipient_siret = Some(siret.into());
        self
    }

    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = document_type.into();
        self
    }

    pub fn with_local_recipient(mut self, local: bool) -> Self {
        self.local_recipient = local;
        self
    }
}
