//! SMP metadata retrieval over HTTP.

mod metadata;
mod smp_client;

pub use metadata::{parse_service_metadata, SMP_NAMESPACE};
pub use smp_client::{service_metadata_url, HttpSmpClient};
