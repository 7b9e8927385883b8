//! DNS wire format (RFC 1035) for the test responder and the SML resolver.
//!
//! Parsing follows compression pointers; building always writes names in
//! full. CNAME and NAPTR rdata are decompressed at parse time so every
//! parsed record carries self-contained rdata.

mod errors;
mod message;
mod name;
mod rdata;

pub use errors::WireError;
pub use message::{DnsMessage, DnsQuestion, DnsResourceRecord, HEADER_SIZE, MAX_UDP_PAYLOAD};
pub use name::MAX_POINTER_HOPS;
pub use rdata::{NaptrData, RData};
