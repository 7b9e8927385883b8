mod participant_lookup;
mod sml_resolver;
mod smp_client;
mod stage_publisher;

pub use participant_lookup::ParticipantLookup;
pub use sml_resolver::SmlResolver;
pub use smp_client::{SmpClient, SmpError};
pub use stage_publisher::StagePublisher;

// Re-export for convenience
pub use pac_routing_domain::{PeppolEndpoint, PeppolLookupResult};
