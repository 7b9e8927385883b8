use async_trait::async_trait;
use bytes::Bytes;
use pac_routing_application::ports::{
    ParticipantLookup, SmlResolver, SmpClient, SmpError, StagePublisher,
};
use pac_routing_domain::{DomainError, PeppolEndpoint, PeppolLookupResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct MockSmlResolver {
    entries: Arc<RwLock<HashMap<String, String>>>,
    should_fail: Arc<RwLock<bool>>,
    queried: Arc<RwLock<Vec<String>>>,
}

impl MockSmlResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_smp_url(&self, hostname: &str, smp_url: &str) {
        self.entries
            .write()
            .unwrap()
            .insert(hostname.to_string(), smp_url.to_string());
    }

    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write().unwrap() = fail;
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.read().unwrap().clone()
    }
}

#[async_trait]
impl SmlResolver for MockSmlResolver {
    async fn resolve_smp_url(&self, hostname: &str) -> Result<Option<String>, DomainError> {
        self.queried.write().unwrap().push(hostname.to_string());
        if *self.should_fail.read().unwrap() {
            return Err(DomainError::TransportTimeout {
                server: "127.0.0.1:53".to_string(),
            });
        }
        Ok(self.entries.read().unwrap().get(hostname).cloned())
    }
}

#[derive(Clone)]
pub struct MockSmpClient {
    response: Arc<RwLock<Result<Option<PeppolEndpoint>, SmpError>>>,
    calls: Arc<RwLock<Vec<(String, String, String, String)>>>,
}

impl MockSmpClient {
    pub fn new() -> Self {
        Self {
            response: Arc::new(RwLock::new(Ok(None))),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn set_response(&self, response: Result<Option<PeppolEndpoint>, SmpError>) {
        *self.response.write().unwrap() = response;
    }

    /// Recorded `(smp_url, scheme, participant, document_type_id)` tuples.
    pub fn calls(&self) -> Vec<(String, String, String, String)> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl SmpClient for MockSmpClient {
    async fn fetch_endpoint(
        &self,
        smp_url: &str,
        scheme_id: &str,
        participant_id: &str,
        document_type_id: &str,
    ) -> Result<Option<PeppolEndpoint>, SmpError> {
        self.calls.write().unwrap().push((
            smp_url.to_string(),
            scheme_id.to_string(),
            participant_id.to_string(),
            document_type_id.to_string(),
        ));
        self.response.read().unwrap().clone()
    }
}

pub enum LookupBehavior {
    Answer(PeppolLookupResult),
    Fail(DomainError),
    Panic(&'static str),
}

/// Lookup double with a fixed behavior and a call counter.
pub struct MockParticipantLookup {
    behavior: LookupBehavior,
    calls: AtomicUsize,
    last_key: RwLock<Option<String>>,
}

impl MockParticipantLookup {
    pub fn answering(result: PeppolLookupResult) -> Self {
        Self::with_behavior(LookupBehavior::Answer(result))
    }

    pub fn failing(error: DomainError) -> Self {
        Self::with_behavior(LookupBehavior::Fail(error))
    }

    pub fn panicking(reason: &'static str) -> Self {
        Self::with_behavior(LookupBehavior::Panic(reason))
    }

    fn with_behavior(behavior: LookupBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_key: RwLock::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_key(&self) -> Option<String> {
        self.last_key.read().unwrap().clone()
    }
}

#[async_trait]
impl ParticipantLookup for MockParticipantLookup {
    async fn lookup(
        &self,
        scheme_id: &str,
        participant_id: &str,
        _document_type: &str,
    ) -> Result<PeppolLookupResult, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_key.write().unwrap() = Some(format!("{}::{}", scheme_id, participant_id));
        match &self.behavior {
            LookupBehavior::Answer(result) => Ok(result.clone()),
            LookupBehavior::Fail(error) => Err(error.clone()),
            LookupBehavior::Panic(reason) => panic!("{}", reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PublishedMessage {
    pub subject: String,
    pub payload: Bytes,
    pub correlation_id: Option<String>,
}

impl PublishedMessage {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.payload).unwrap()
    }
}

#[derive(Clone, Default)]
pub struct RecordingPublisher {
    messages: Arc<RwLock<Vec<PublishedMessage>>>,
    should_fail: Arc<RwLock<bool>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write().unwrap() = fail;
    }

    pub fn messages(&self) -> Vec<PublishedMessage> {
        self.messages.read().unwrap().clone()
    }
}

#[async_trait]
impl StagePublisher for RecordingPublisher {
    async fn publish(
        &self,
        subject: &str,
        payload: Bytes,
        correlation_id: Option<&str>,
    ) -> Result<(), DomainError> {
        if *self.should_fail.read().unwrap() {
            return Err(DomainError::PublishFailed {
                subject: subject.to_string(),
                reason: "connection closed".to_string(),
            });
        }
        self.messages.write().unwrap().push(PublishedMessage {
            subject: subject.to_string(),
            payload,
            correlation_id: correlation_id.map(str::to_string),
        });
        Ok(())
    }
}
