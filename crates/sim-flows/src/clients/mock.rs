//! Clientes deterministas para pruebas y para el runner de demostración.
//!
//! Devuelven valores fijos, registran cada llamada con sus argumentos y
//! permiten encolar fallos por método (`fail_next`). La latencia artificial
//! es opcional.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{PostJourneyClient, PubkyClient};
use crate::data::{DiscoveryResult, IndexResult, Keypair, Post, PublishResult, Session};
use crate::errors::ClientError;

pub const MOCK_PUBLIC_KEY: &str = "8pinxxgqs41n4aididenw5apqp1urfmzdztr8jt4abrkdn435ewo";
pub const MOCK_SECRET_KEY: [u8; 4] = [1, 2, 3, 4];
pub const MOCK_RECOVERY_FILE: [u8; 4] = [5, 6, 7, 8];
pub const MOCK_CAPABILITY: &str = "/pub/pubky.app/:rw";
pub const MOCK_TIMESTAMP: i64 = 1_735_689_600_000;
pub const MOCK_POST_ID: &str = "0033sp4ba29m0";
pub const MOCK_DISCOVERING_APPS: [&str; 2] = ["pubky.app", "eventky.app"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockMethod {
    GenerateKeypair,
    CreateRecoveryFile,
    Signup,
    VerifySession,
    PublishPost,
    IndexPost,
    DiscoverPost,
}

/// Llamada registrada por un cliente mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    GenerateKeypair,
    CreateRecoveryFile { secret_key: Vec<u8>, passphrase: String },
    Signup { secret_key: Vec<u8>, homeserver: String, signup_token: Option<String> },
    VerifySession { public_key: String },
    PublishPost { post: Post, secret_key: Vec<u8> },
    IndexPost { uri: String },
    DiscoverPost { uri: String },
}

impl ClientCall {
    pub fn method(&self) -> MockMethod {
        match self {
            ClientCall::GenerateKeypair => MockMethod::GenerateKeypair,
            ClientCall::CreateRecoveryFile { .. } => MockMethod::CreateRecoveryFile,
            ClientCall::Signup { .. } => MockMethod::Signup,
            ClientCall::VerifySession { .. } => MockMethod::VerifySession,
            ClientCall::PublishPost { .. } => MockMethod::PublishPost,
            ClientCall::IndexPost { .. } => MockMethod::IndexPost,
            ClientCall::DiscoverPost { .. } => MockMethod::DiscoverPost,
        }
    }
}

/// Estado compartido por ambos mocks: latencia, log de llamadas y fallos encolados.
#[derive(Debug, Default)]
struct Recorder {
    latency: Option<Duration>,
    calls: Mutex<Vec<ClientCall>>,
    failures: Mutex<HashMap<MockMethod, VecDeque<ClientError>>>,
}

impl Recorder {
    /// Registra la llamada, aplica la latencia y consume un fallo encolado si lo hay.
    async fn enter(&self, call: ClientCall) -> Result<(), ClientError> {
        let method = call.method();
        debug!(?method, "mock client call");
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).push(call);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let queued = self.failures
                         .lock()
                         .unwrap_or_else(|p| p.into_inner())
                         .get_mut(&method)
                         .and_then(VecDeque::pop_front);
        match queued {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fail_next(&self, method: MockMethod, err: ClientError) {
        self.failures.lock().unwrap_or_else(|p| p.into_inner()).entry(method).or_default().push_back(err);
    }

    fn calls(&self) -> Vec<ClientCall> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn call_count(&self, method: MockMethod) -> usize {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).iter().filter(|c| c.method() == method).count()
    }
}

/// Doble de `PubkyClient`.
#[derive(Debug, Default)]
pub struct MockPubkyClient {
    recorder: Recorder,
    required_signup_token: Option<String>,
}

impl MockPubkyClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.recorder.latency = Some(latency).filter(|d| !d.is_zero());
        self
    }

    /// El signup sólo acepta este token; cualquier otro falla con `Authentication`.
    pub fn with_required_signup_token(mut self, token: impl Into<String>) -> Self {
        self.required_signup_token = Some(token.into());
        self
    }

    /// Encola un fallo que consumirá la próxima llamada a `method`.
    pub fn fail_next(&self, method: MockMethod, err: ClientError) {
        self.recorder.fail_next(method, err);
    }

    pub fn calls(&self) -> Vec<ClientCall> {
        self.recorder.calls()
    }

    pub fn call_count(&self, method: MockMethod) -> usize {
        self.recorder.call_count(method)
    }

    pub fn keypair() -> Keypair {
        Keypair { public_key: MOCK_PUBLIC_KEY.to_string(),
                  secret_key: MOCK_SECRET_KEY.to_vec() }
    }
}

#[async_trait]
impl PubkyClient for MockPubkyClient {
    async fn generate_keypair(&self) -> Result<Keypair, ClientError> {
        self.recorder.enter(ClientCall::GenerateKeypair).await?;
        Ok(Self::keypair())
    }

    async fn create_recovery_file(&self, secret_key: &[u8], passphrase: &str) -> Result<Vec<u8>, ClientError> {
        self.recorder
            .enter(ClientCall::CreateRecoveryFile { secret_key: secret_key.to_vec(),
                                                    passphrase: passphrase.to_string() })
            .await?;
        if passphrase.is_empty() {
            return Err(ClientError::Validation("Passphrase must not be empty".into()));
        }
        Ok(MOCK_RECOVERY_FILE.to_vec())
    }

    async fn signup(&self, secret_key: &[u8], homeserver: &str, signup_token: Option<&str>) -> Result<Session, ClientError> {
        self.recorder
            .enter(ClientCall::Signup { secret_key: secret_key.to_vec(),
                                        homeserver: homeserver.to_string(),
                                        signup_token: signup_token.map(str::to_string) })
            .await?;
        if let Some(required) = &self.required_signup_token {
            if signup_token != Some(required.as_str()) {
                return Err(ClientError::Authentication("Invalid signup token".into()));
            }
        }
        Ok(Session { public_key: MOCK_PUBLIC_KEY.to_string(),
                     capabilities: vec![MOCK_CAPABILITY.to_string()],
                     homeserver: homeserver.to_string() })
    }

    async fn verify_session(&self, public_key: &str) -> Result<bool, ClientError> {
        self.recorder.enter(ClientCall::VerifySession { public_key: public_key.to_string() }).await?;
        Ok(public_key == MOCK_PUBLIC_KEY)
    }
}

/// Doble de `PostJourneyClient`.
#[derive(Debug, Default)]
pub struct MockPostJourneyClient {
    recorder: Recorder,
}

impl MockPostJourneyClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.recorder.latency = Some(latency).filter(|d| !d.is_zero());
        self
    }

    pub fn fail_next(&self, method: MockMethod, err: ClientError) {
        self.recorder.fail_next(method, err);
    }

    pub fn calls(&self) -> Vec<ClientCall> {
        self.recorder.calls()
    }

    pub fn call_count(&self, method: MockMethod) -> usize {
        self.recorder.call_count(method)
    }

    pub fn post_uri() -> String {
        format!("pubky://{MOCK_PUBLIC_KEY}/pub/pubky.app/posts/{MOCK_POST_ID}")
    }

    pub fn publish_result() -> PublishResult {
        PublishResult { uri: Self::post_uri(),
                        timestamp: MOCK_TIMESTAMP }
    }

    pub fn index_result() -> IndexResult {
        IndexResult { indexed: true,
                      nexus_timestamp: MOCK_TIMESTAMP + 250 }
    }

    pub fn discovery_result() -> DiscoveryResult {
        DiscoveryResult { discovered_by: MOCK_DISCOVERING_APPS.iter().map(|s| s.to_string()).collect(),
                          timestamp: MOCK_TIMESTAMP + 500 }
    }
}

#[async_trait]
impl PostJourneyClient for MockPostJourneyClient {
    async fn publish_post(&self, post: &Post, secret_key: &[u8]) -> Result<PublishResult, ClientError> {
        self.recorder
            .enter(ClientCall::PublishPost { post: post.clone(),
                                             secret_key: secret_key.to_vec() })
            .await?;
        if post.content.trim().is_empty() {
            return Err(ClientError::Validation("Post content must not be empty".into()));
        }
        Ok(Self::publish_result())
    }

    async fn index_post(&self, uri: &str) -> Result<IndexResult, ClientError> {
        self.recorder.enter(ClientCall::IndexPost { uri: uri.to_string() }).await?;
        Ok(Self::index_result())
    }

    async fn discover_post(&self, uri: &str) -> Result<DiscoveryResult, ClientError> {
        self.recorder.enter(ClientCall::DiscoverPost { uri: uri.to_string() }).await?;
        Ok(Self::discovery_result())
    }
}
