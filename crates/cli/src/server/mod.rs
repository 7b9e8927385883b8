pub mod dns;
pub mod pipeline;

pub use dns::run_dns_responder;
pub use pipeline::run_routing_stage;
