//! PAC Routing Domain Layer
pub mod config;
pub mod dns_record;
pub mod errors;
pub mod invoice;
pub mod lookup;
pub mod peppol;
pub mod routing;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_record::{RecordClass, RecordType};
pub use errors::DomainError;
pub use invoice::InvoiceMessage;
pub use lookup::{ErrorCode, PeppolEndpoint, PeppolLookupResult};
pub use peppol::{
    compute_participant_hash, compute_sml_hostname, resolve_document_type, PeppolEnvironment,
    PeppolScheme, AS4_TRANSPORT_PROFILE, DEFAULT_DOCUMENT_TYPE,
};
pub use routing::{RoutingResult, RoutingStatus, PPF_API_URL};
