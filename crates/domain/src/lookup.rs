use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Failure taxonomy shared by discovery and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ParticipantNotFound,
    SmpTimeout,
    SmpUnavailable,
    SmpError,
    DocumentTypeNotSupported,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ParticipantNotFound => "PARTICIPANT_NOT_FOUND",
            ErrorCode::SmpTimeout => "SMP_TIMEOUT",
            ErrorCode::SmpUnavailable => "SMP_UNAVAILABLE",
            ErrorCode::SmpError => "SMP_ERROR",
            ErrorCode::DocumentTypeNotSupported => "DOCUMENT_TYPE_NOT_SUPPORTED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Default human readable message for the code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ParticipantNotFound => "Participant not found in the SML",
            ErrorCode::SmpTimeout => "Timeout during SMP request",
            ErrorCode::SmpUnavailable => "SMP temporarily unavailable",
            ErrorCode::SmpError => "SMP error",
            ErrorCode::DocumentTypeNotSupported => "Participant does not support the document type",
            ErrorCode::InternalError => "Internal routing error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PARTICIPANT_NOT_FOUND" => Ok(ErrorCode::ParticipantNotFound),
            "SMP_TIMEOUT" => Ok(ErrorCode::SmpTimeout),
            "SMP_UNAVAILABLE" => Ok(ErrorCode::SmpUnavailable),
            "SMP_ERROR" => Ok(ErrorCode::SmpError),
            "DOCUMENT_TYPE_NOT_SUPPORTED" => Ok(ErrorCode::DocumentTypeNotSupported),
            "INTERNAL_ERROR" => Ok(ErrorCode::InternalError),
            _ => Err(DomainError::UnknownErrorCode(s.to_string())),
        }
    }
}

/// A delivery target published by an SMP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PeppolEndpoint {
    pub address: String,
    pub certificate: String,
    pub transport_profile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_contact_url: Option<String>,
}

impl PeppolEndpoint {
    pub fn new(
        address: impl Into<String>,
        certificate: impl Into<String>,
        transport_profile: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            certificate: certificate.into(),
            transport_profile: transport_profile.into(),
            service_description: None,
            technical_contact_url: None,
        }
    }

    pub fn with_service_description(mut self, description: impl Into<String>) -> Self {
        self.service_description = Some(description.into());
        self
    }

    pub fn with_technical_contact_url(mut self, url: impl Into<String>) -> Self {
        self.technical_contact_url = Some(url.into());
        self
    }
}

/// Outcome of one discovery lookup.
///
/// Build it through [`PeppolLookupResult::found`] or
/// [`PeppolLookupResult::failed`]: a successful result always carries an
/// endpoint and a failed one always carries an error code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PeppolLookupResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<PeppolEndpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smp_url: Option<String>,
}

impl PeppolLookupResult {
    pub fn found(endpoint: PeppolEndpoint, smp_url: Option<String>) -> Self {
        Self {
            success: true,
            endpoint: Some(endpoint),
            error_code: None,
            error_message: None,
            smp_url,
        }
    }

    pub fn failed(code: ErrorCode, message: impl Into<String>, smp_url: Option<String>) -> Self {
        Self {
            success: false,
            endpoint: None,
            error_code: Some(code),
            error_message: Some(message.into()),
            smp_url,
        }
    }

    /// Failure carrying the code's default message.
    pub fn failed_with_default(code: ErrorCode, smp_url: Option<String>) -> Self {
        Self::failed(code, code.default_message(), smp_url)
    }

    pub fn is_error(&self, code: ErrorCode) -> bool {
        self.error_code == Some(code)
    }
}
