//! Lifecycle management for the processes integration tests run against.
//!
//! A service is either spawned locally ([`LocalProcessService`]) or already
//! running somewhere ([`RemoteService`]); [`ServiceHandle`] selects between
//! the two.

mod errors;
mod local;
mod probe;
mod remote;

pub use errors::ServiceError;
pub use local::{LocalProcessService, LocalServiceConfig};
pub use probe::ReadinessProbe;
pub use remote::RemoteService;

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait ManagedService: Send + Sync {
    /// URL clients use to reach the service (`http://…`, `nats://…`).
    fn endpoint(&self) -> String;

    fn is_running(&mut self) -> bool;

    /// Brings the service up and returns once it is ready.
    async fn start(&mut self) -> Result<(), ServiceError>;

    async fn stop(&mut self) -> Result<(), ServiceError>;

    async fn wait_ready(&self, timeout: Duration) -> bool;
}

pub enum ServiceHandle {
    Local(LocalProcessService),
    Remote(RemoteService),
}

impl ServiceHandle {
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Local(s) => s.name(),
            Self::Remote(s) => s.name(),
        }
    }
}

#[async_trait]
impl ManagedService for ServiceHandle {
    fn endpoint(&self) -> String {
        match self {
            Self::Local(s) => s.endpoint(),
            Self::Remote(s) => s.endpoint(),
        }
    }

    fn is_running(&mut self) -> bool {
        match self {
            Self::Local(s) => s.is_running(),
            Self::Remote(s) => s.is_running(),
        }
    }

    async fn start(&mut self) -> Result<(), ServiceError> {
        match self {
            Self::Local(s) => s.start().await,
            Self::Remote(s) => s.start().await,
        }
    }

    async fn stop(&mut self) -> Result<(), ServiceError> {
        match self {
            Self::Local(s) => s.stop().await,
            Self::Remote(s) => s.stop().await,
        }
    }

    async fn wait_ready(&self, timeout: Duration) -> bool {
        match self {
            Self::Local(s) => s.wait_ready(timeout).await,
            Self::Remote(s) => s.wait_ready(timeout).await,
        }
    }
}
