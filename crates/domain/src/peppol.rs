//! Discovery-network identifiers: environments, schemes, document types and
//! the SML hostname rule.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Transport profile of the AS4 endpoints this platform delivers to.
pub const AS4_TRANSPORT_PROFILE: &str = "peppol-transport-as4-v2_0";

/// Document type assumed when an invoice does not name one.
pub const DEFAULT_DOCUMENT_TYPE: &str = "invoice_ubl";

/// Identifier scheme used in the participant part of SMP URLs.
pub const PARTICIPANT_ID_SCHEME: &str = "iso6523-actorid-upis";

const DOCUMENT_TYPES: &[(&str, &str)] = &[
    (
        "invoice_ubl",
        "busdox-docid-qns::urn:oasis:names:specification:ubl:schema:xsd:\
         Invoice-2::Invoice##urn:cen.eu:en16931:2017#compliant#\
         urn:fdc:peppol.eu:2017:poacc:billing:3.0::2.1",
    ),
    (
        "invoice_cii",
        "busdox-docid-qns::urn:un:unece:uncefact:data:standard:\
         CrossIndustryInvoice:100::CrossIndustryInvoice##\
         urn:cen.eu:en16931:2017#compliant#\
         urn:fdc:peppol.eu:2017:poacc:billing:3.0::D16B",
    ),
    (
        "credit_note",
        "busdox-docid-qns::urn:oasis:names:specification:ubl:schema:xsd:\
         CreditNote-2::CreditNote##urn:cen.eu:en16931:2017#compliant#\
         urn:fdc:peppol.eu:2017:poacc:billing:3.0::2.1",
    ),
];

/// SML roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeppolEnvironment {
    #[default]
    Production,
    Test,
}

impl PeppolEnvironment {
    pub fn zone(&self) -> &'static str {
        match self {
            PeppolEnvironment::Production => "edelivery.tech.ec.europa.eu",
            PeppolEnvironment::Test => "acc.edelivery.tech.ec.europa.eu",
        }
    }
}

impl FromStr for PeppolEnvironment {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(PeppolEnvironment::Production),
            "test" | "acc" => Ok(PeppolEnvironment::Test),
            other => Err(DomainError::ConfigError(format!(
                "Unknown discovery environment: {}",
                other
            ))),
        }
    }
}

/// Identification schemes used for French participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeppolScheme {
    /// 9 digits
    Siren,
    /// 14 digits
    Siret,
    /// "FR" followed by 11 characters
    TvaFr,
}

impl PeppolScheme {
    pub fn code(&self) -> &'static str {
        match self {
            PeppolScheme::Siren => "0009",
            PeppolScheme::Siret => "0002",
            PeppolScheme::TvaFr => "9957",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeppolScheme::Siren => "SIREN",
            PeppolScheme::Siret => "SIRET",
            PeppolScheme::TvaFr => "TVA_FR",
        }
    }
}

impl fmt::Display for PeppolScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PeppolScheme {
    type Err = DomainError;

    /// Accepts either the scheme name (`SIREN`) or its numeric code (`0009`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SIREN" | "0009" => Ok(PeppolScheme::Siren),
            "SIRET" | "0002" => Ok(PeppolScheme::Siret),
            "TVA_FR" | "9957" => Ok(PeppolScheme::TvaFr),
            _ => Err(DomainError::UnknownScheme(s.to_string())),
        }
    }
}

/// Hex MD5 of the lower-cased `"{scheme_id}::{participant_id}"`.
pub fn compute_participant_hash(scheme_id: &str, participant_id: &str) -> String {
    let full_id = format!("{}::{}", scheme_id, participant_id).to_lowercase();
    format!("{:x}", Md5::digest(full_id.as_bytes()))
}

/// `B-{hash}.iso6523-actorid-upis.{zone}`
pub fn compute_sml_hostname(sml_zone: &str, scheme_id: &str, participant_id: &str) -> String {
    format!(
        "B-{}.{}.{}",
        compute_participant_hash(scheme_id, participant_id),
        PARTICIPANT_ID_SCHEME,
        sml_zone
    )
}

/// Maps a document-type key to its full identifier. Unknown keys are
/// returned unchanged so callers may pass full identifiers directly.
pub fn resolve_document_type(document_type: &str) -> &str {
    DOCUMENT_TYPES
        .iter()
        .find(|(key, _)| *key == document_type)
        .map(|(_, id)| *id)
        .unwrap_or(document_type)
}
