//! sim-flows: step sets de Pubky sobre el motor de `sim-core`.
//!
//! Este crate provee:
//! - Registros tipados de datos acumulados (`IdentityBirthData`,
//!   `PostJourneyData`).
//! - Los traits de cliente inyectados (`PubkyClient`, `PostJourneyClient`) y
//!   sus dobles deterministas.
//! - Los constructores `identity_birth_steps` y `post_journey_steps`.

pub mod clients;
pub mod data;
pub mod errors;
pub mod steps;

pub use clients::{MockPostJourneyClient, MockPubkyClient, PostJourneyClient, PubkyClient};
pub use data::{DiscoveryResult, IdentityBirthData, IndexResult, Keypair, Post, PostJourneyData, PublishResult, Session};
pub use errors::ClientError;
pub use steps::{identity_birth_steps, post_journey_steps, IdentityBirthConfig, PostJourneyConfig};
