//! Capacidades de cliente inyectadas en los step sets.
//!
//! Cada step set recibe un trait con exactamente las operaciones que usan sus
//! steps. Las implementaciones reales (red, criptografía) viven fuera de
//! este crate; aquí sólo están los contratos y los dobles de prueba.

pub mod mock;

use async_trait::async_trait;

use crate::data::{DiscoveryResult, IndexResult, Keypair, Post, PublishResult, Session};
use crate::errors::ClientError;

pub use mock::{ClientCall, MockMethod, MockPostJourneyClient, MockPubkyClient};

/// Operaciones de identidad Pubky usadas por Identity Birth.
#[async_trait]
pub trait PubkyClient: Send + Sync {
    /// Genera un par de claves Ed25519 nuevo.
    async fn generate_keypair(&self) -> Result<Keypair, ClientError>;

    /// Cifra la clave secreta con `passphrase` en un archivo de recuperación.
    async fn create_recovery_file(&self, secret_key: &[u8], passphrase: &str) -> Result<Vec<u8>, ClientError>;

    /// Publica en la DHT y registra la identidad en `homeserver`.
    async fn signup(&self, secret_key: &[u8], homeserver: &str, signup_token: Option<&str>) -> Result<Session, ClientError>;

    /// Comprueba que la sesión de `public_key` está activa.
    async fn verify_session(&self, public_key: &str) -> Result<bool, ClientError>;
}

/// Operaciones usadas por Post Journey.
#[async_trait]
pub trait PostJourneyClient: Send + Sync {
    async fn publish_post(&self, post: &Post, secret_key: &[u8]) -> Result<PublishResult, ClientError>;

    /// Nexus indexa el post publicado en `uri`.
    async fn index_post(&self, uri: &str) -> Result<IndexResult, ClientError>;

    /// Aplicaciones que descubren el post en `uri`.
    async fn discover_post(&self, uri: &str) -> Result<DiscoveryResult, ClientError>;
}
