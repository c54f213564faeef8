//! Identity Birth: generate-keypair → create-recovery-file →
//! signup-to-homeserver → verify-session.
//!
//! Cada operación valida sus prerequisitos en el acumulado, llama a una sola
//! capacidad del `PubkyClient` y devuelve únicamente las claves que produce.

use std::fmt;
use std::sync::Arc;

use sim_core::{SimulationError, Step, StepError, StepSet};
use uuid::Uuid;

use crate::clients::PubkyClient;
use crate::data::IdentityBirthData;

pub const GENERATE_KEYPAIR: &str = "generate-keypair";
pub const CREATE_RECOVERY_FILE: &str = "create-recovery-file";
pub const SIGNUP_TO_HOMESERVER: &str = "signup-to-homeserver";
pub const VERIFY_SESSION: &str = "verify-session";

/// Configuración del flujo. El cliente se inyecta para poder sustituirlo por
/// un doble de prueba.
#[derive(Clone)]
pub struct IdentityBirthConfig {
    /// Clave pública (z-base-32) del homeserver.
    pub homeserver: String,
    pub signup_token: Option<String>,
    pub client: Arc<dyn PubkyClient>,
}

impl fmt::Debug for IdentityBirthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityBirthConfig")
         .field("homeserver", &self.homeserver)
         .field("signup_token", &self.signup_token.as_ref().map(|_| "<redacted>"))
         .finish_non_exhaustive()
    }
}

/// Construye los cuatro steps de Identity Birth.
pub fn identity_birth_steps(config: &IdentityBirthConfig) -> Result<StepSet<IdentityBirthData>, SimulationError> {
    let client = Arc::clone(&config.client);
    let generate = Step::new(GENERATE_KEYPAIR, "Generate Keypair", move |_data: IdentityBirthData| {
        let client = Arc::clone(&client);
        async move { generate_keypair(client.as_ref()).await }
    });

    let client = Arc::clone(&config.client);
    let recovery = Step::new(CREATE_RECOVERY_FILE, "Create Recovery File", move |data: IdentityBirthData| {
        let client = Arc::clone(&client);
        async move { create_recovery_file(client.as_ref(), &data).await }
    });

    let client = Arc::clone(&config.client);
    let homeserver = config.homeserver.clone();
    let token = config.signup_token.clone();
    let signup = Step::new(SIGNUP_TO_HOMESERVER, "Signup to Homeserver", move |data: IdentityBirthData| {
        let client = Arc::clone(&client);
        let homeserver = homeserver.clone();
        let token = token.clone();
        async move { signup(client.as_ref(), &data, &homeserver, token.as_deref()).await }
    });

    let client = Arc::clone(&config.client);
    let verify = Step::new(VERIFY_SESSION, "Verify Session", move |data: IdentityBirthData| {
        let client = Arc::clone(&client);
        async move { verify_session(client.as_ref(), &data).await }
    });

    StepSet::new(vec![generate, recovery, signup, verify])
}

async fn generate_keypair(client: &dyn PubkyClient) -> Result<IdentityBirthData, StepError> {
    let keypair = client.generate_keypair().await?;
    Ok(IdentityBirthData { keypair: Some(keypair),
                           ..Default::default() })
}

async fn create_recovery_file(client: &dyn PubkyClient, data: &IdentityBirthData) -> Result<IdentityBirthData, StepError> {
    let keypair = data.keypair.as_ref().ok_or_else(|| StepError::missing("Keypair"))?;
    let passphrase = generate_passphrase();
    let recovery_file = client.create_recovery_file(&keypair.secret_key, &passphrase).await?;
    Ok(IdentityBirthData { recovery_file: Some(recovery_file),
                           passphrase: Some(passphrase),
                           ..Default::default() })
}

async fn signup(client: &dyn PubkyClient,
                data: &IdentityBirthData,
                homeserver: &str,
                signup_token: Option<&str>)
                -> Result<IdentityBirthData, StepError> {
    let keypair = data.keypair.as_ref().ok_or_else(|| StepError::missing("Keypair"))?;
    let session = client.signup(&keypair.secret_key, homeserver, signup_token).await?;
    Ok(IdentityBirthData { session: Some(session),
                           ..Default::default() })
}

async fn verify_session(client: &dyn PubkyClient, data: &IdentityBirthData) -> Result<IdentityBirthData, StepError> {
    let session = data.session.as_ref().ok_or_else(|| StepError::missing("Session"))?;
    let verified = client.verify_session(&session.public_key).await?;
    Ok(IdentityBirthData { verified: Some(verified),
                           ..Default::default() })
}

/// Passphrase de demostración: cuatro grupos hex derivados de un UUID v4.
fn generate_passphrase() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    raw.as_bytes()
       .chunks(4)
       .take(4)
       .map(|c| String::from_utf8_lossy(c).into_owned())
       .collect::<Vec<_>>()
       .join("-")
}
