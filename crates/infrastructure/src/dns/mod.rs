pub mod responder;
pub mod sml_resolver;
pub mod wire;

pub use responder::{DnsResponder, RecordTable, ResponderError};
pub use sml_resolver::WireSmlResolver;
