mod discovery;
mod pipeline;

pub use discovery::{build_lookup, scheme_code};
pub use pipeline::build_routing_stage;
