//! PAC Routing Application Layer
//!
//! Ports (traits) implemented by the infrastructure crate, the discovery
//! services built on them, and the routing use cases.
pub mod ports;
pub mod services;
pub mod use_cases;
