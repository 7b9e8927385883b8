pub mod discovery;
pub mod errors;
pub mod logging;
pub mod pipeline;
pub mod responder;
pub mod root;

pub use discovery::{DiscoveryConfig, DiscoveryMode, StubResponseConfig};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use pipeline::PipelineConfig;
pub use responder::{LocalRecordConfig, NaptrRecordConfig, ParticipantRecordConfig, ResponderConfig};
pub use root::{CliOverrides, Config};
