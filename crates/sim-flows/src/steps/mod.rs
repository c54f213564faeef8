//! Constructores de step sets. Son fábricas puras: no hacen IO propio y toda
//! la secuenciación queda en el engine.

pub mod identity_birth;
pub mod post_journey;

pub use identity_birth::{identity_birth_steps, IdentityBirthConfig};
pub use post_journey::{post_journey_steps, PostJourneyConfig};
