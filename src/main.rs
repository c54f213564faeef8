//! Runner de demostración: recorre Identity Birth y/o Post Journey con los
//! clientes mock, imprimiendo el estado tras cada transición.
//!
//! Uso: `pubkytecture [identity|post|all] [--fail-at <step-id>] [--latency-ms <n>]`
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use pubkytecture::sim_core::{SimulationEngine, StepData};
use pubkytecture::sim_flows::clients::{MockMethod, MockPostJourneyClient, MockPubkyClient};
use pubkytecture::sim_flows::steps::{identity_birth, post_journey};
use pubkytecture::sim_flows::{identity_birth_steps, post_journey_steps, ClientError, Post};
use pubkytecture::{AppConfig, CoreError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Flow {
    Identity,
    Post,
    All,
}

#[derive(Debug, Parser)]
#[command(name = "pubkytecture", about = "Simulación paso a paso de identidad y publicación en Pubky")]
struct Cli {
    /// Flujo a simular.
    #[arg(value_enum, default_value_t = Flow::All)]
    flow: Flow,
    /// Inyecta un fallo (una sola vez) en el step indicado; el runner reintenta.
    #[arg(long)]
    fail_at: Option<String>,
    /// Latencia artificial de los mocks; sobrescribe SIM_MOCK_LATENCY_MS.
    #[arg(long)]
    latency_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .init();

    let cli = Cli::parse();
    if let Some(step) = cli.fail_at.as_deref() {
        if identity_method(step).is_none() && post_method(step).is_none() {
            warn!(step, "--fail-at no corresponde a ningún step con cliente; se ignora");
        }
    }
    let mut config = AppConfig::from_env()?;
    if let Some(ms) = cli.latency_ms {
        config.mock_latency = Duration::from_millis(ms);
    }
    info!(homeserver = %config.homeserver, latency_ms = config.mock_latency.as_millis() as u64, "configuración cargada");

    let mut secret_key = MockPubkyClient::keypair().secret_key;

    if matches!(cli.flow, Flow::Identity | Flow::All) {
        let client = Arc::new(MockPubkyClient::new().with_latency(config.mock_latency));
        if let Some(method) = cli.fail_at.as_deref().and_then(identity_method) {
            client.fail_next(method, ClientError::Network("fallo inyectado".into()));
        }
        let engine = SimulationEngine::new(identity_birth_steps(&config.identity_birth(client.clone()))?);
        drive("Identity Birth", &engine).await?;
        if let Some(keypair) = engine.data().keypair {
            secret_key = keypair.secret_key;
        }
    }

    if matches!(cli.flow, Flow::Post | Flow::All) {
        let client = Arc::new(MockPostJourneyClient::new().with_latency(config.mock_latency));
        if let Some(method) = cli.fail_at.as_deref().and_then(post_method) {
            client.fail_next(method, ClientError::Network("fallo inyectado".into()));
        }
        let post = Post { content: "Hello from pubkytecture".into(),
                          image_url: None,
                          timestamp: chrono::Utc::now().timestamp_millis() };
        let engine = SimulationEngine::new(post_journey_steps(&config.post_journey(post, secret_key, client.clone()))?);
        drive("Post Journey", &engine).await?;
    }

    Ok(())
}

/// Avanza hasta el final; ante un error reintenta una vez.
async fn drive<D: StepData>(name: &str, engine: &SimulationEngine<D>) -> Result<(), CoreError> {
    println!("== {name} ({} steps, run {})", engine.total_steps(), engine.run_id());
    while !engine.is_finished() {
        let title = engine.current_step_descriptor().map(|s| s.title().to_string()).unwrap_or_default();
        engine.next().await;
        report(&title, engine);

        if engine.status().is_error() {
            warn!(step = %title, "step falló, reintentando");
            engine.retry().await;
            report(&title, engine);
            if let Some(err) = engine.error() {
                return Err(CoreError::Internal(format!("{name}: {}", err.message())));
            }
        }
    }
    println!("{}", serde_json::to_string_pretty(&engine.state())?);
    Ok(())
}

fn report<D: StepData>(title: &str, engine: &SimulationEngine<D>) {
    let label = if title.is_empty() { "intro" } else { title };
    match engine.error() {
        Some(err) => println!("  [{}/{}] {label}: {} ({})", engine.current_step(), engine.total_steps(), engine.status(), err.message()),
        None => println!("  [{}/{}] {label}: {}", engine.current_step(), engine.total_steps(), engine.status()),
    }
}

fn identity_method(step: &str) -> Option<MockMethod> {
    match step {
        identity_birth::GENERATE_KEYPAIR => Some(MockMethod::GenerateKeypair),
        identity_birth::CREATE_RECOVERY_FILE => Some(MockMethod::CreateRecoveryFile),
        identity_birth::SIGNUP_TO_HOMESERVER => Some(MockMethod::Signup),
        identity_birth::VERIFY_SESSION => Some(MockMethod::VerifySession),
        _ => None,
    }
}

/// `create-post` no llama al cliente, así que no admite fallos inyectados.
fn post_method(step: &str) -> Option<MockMethod> {
    match step {
        post_journey::PUBLISH_TO_HOMESERVER => Some(MockMethod::PublishPost),
        post_journey::INDEX_POST => Some(MockMethod::IndexPost),
        post_journey::APP_DISCOVERY => Some(MockMethod::DiscoverPost),
        _ => None,
    }
}
