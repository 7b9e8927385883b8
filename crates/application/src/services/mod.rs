mod network_lookup;
mod static_sml_resolver;
mod stub_lookup;

pub use network_lookup::NetworkParticipantLookup;
pub use static_sml_resolver::StaticSmlResolver;
pub use stub_lookup::StubParticipantLookup;
