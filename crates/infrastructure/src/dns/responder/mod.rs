//! Authoritative DNS responder standing in for the SML in tests.

mod errors;
mod records;
mod server;

pub use errors::ResponderError;
pub use records::RecordTable;
pub use server::DnsResponder;
