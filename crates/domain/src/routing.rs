use serde::{Deserialize, Serialize};
use std::fmt;

use crate::lookup::ErrorCode;

/// National fallback platform used when the recipient is not on the network.
pub const PPF_API_URL: &str = "https://api.ppf.gouv.fr";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStatus {
    /// Sent over AS4 to a remote access point
    Routed,
    /// Sent to the fallback platform
    RoutedToPpf,
    /// Delivered locally
    Delivered,
    Error,
    /// Waiting for a retry
    Pending,
}

impl RoutingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingStatus::Routed => "routed",
            RoutingStatus::RoutedToPpf => "routed_to_ppf",
            RoutingStatus::Delivered => "delivered",
            RoutingStatus::Error => "error",
            RoutingStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for RoutingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for one invoice.
///
/// The constructors keep the invariants: `Error` carries an error code,
/// `Routed` and `RoutedToPpf` carry a destination.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoutingResult {
    pub invoice_id: String,
    pub status: RoutingStatus,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub error_code: Option<ErrorCode>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub peppol_lookup_success: Option<bool>,
}

impl RoutingResult {
    pub fn routed(invoice_id: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            status: RoutingStatus::Routed,
            destination: Some(destination.into()),
            error_code: None,
            error_message: None,
            peppol_lookup_success: Some(true),
        }
    }

    pub fn routed_to_ppf(invoice_id: impl Into<String>, fallback_url: impl Into<String>) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            status: RoutingStatus::RoutedToPpf,
            destination: Some(fallback_url.into()),
            error_code: None,
            error_message: None,
            peppol_lookup_success: Some(false),
        }
    }

    pub fn delivered(invoice_id: impl Into<String>) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            status: RoutingStatus::Delivered,
            destination: None,
            error_code: None,
            error_message: None,
            peppol_lookup_success: None,
        }
    }

    pub fn pending(invoice_id: impl Into<String>) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            status: RoutingStatus::Pending,
            destination: None,
            error_code: None,
            error_message: None,
            peppol_lookup_success: None,
        }
    }

    /// `lookup_attempted` tells whether the failure came out of discovery
    /// (`peppol_lookup_success = Some(false)`) or happened before it.
    pub fn error(
        invoice_id: impl Into<String>,
        code: ErrorCode,
        message: Option<String>,
        lookup_attempted: bool,
    ) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            status: RoutingStatus::Error,
            destination: None,
            error_code: Some(code),
            error_message: message,
            peppol_lookup_success: lookup_attempted.then_some(false),
        }
    }

    pub fn internal_error(invoice_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::error(invoice_id, ErrorCode::InternalError, Some(message.into()), false)
    }

    pub fn is_error(&self) -> bool {
        self.status == RoutingStatus::Error
    }
}
