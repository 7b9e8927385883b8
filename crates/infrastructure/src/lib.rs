pub mod discovery;
pub mod dns;
pub mod pipeline;
pub mod services;
