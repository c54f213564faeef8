//! Identity Birth: estructura, contrato de cada step y ejecución completa.

use std::sync::Arc;

use sim_core::{SimulationEngine, SimulationStatus, StepData, StepError, StepSet};
use sim_flows::clients::mock::{ClientCall, MockMethod, MOCK_PUBLIC_KEY, MOCK_RECOVERY_FILE, MOCK_SECRET_KEY};
use sim_flows::{identity_birth_steps, ClientError, IdentityBirthConfig, IdentityBirthData, Keypair, MockPubkyClient, Session};

const HOMESERVER: &str = "mock-homeserver-z32";

fn setup(token: Option<&str>) -> (Arc<MockPubkyClient>, StepSet<IdentityBirthData>) {
    let client = Arc::new(MockPubkyClient::new());
    let config = IdentityBirthConfig { homeserver: HOMESERVER.to_string(),
                                       signup_token: token.map(str::to_string),
                                       client: client.clone() };
    let steps = identity_birth_steps(&config).expect("identity birth step set");
    (client, steps)
}

async fn run_step(steps: &StepSet<IdentityBirthData>, index: usize, data: IdentityBirthData) -> Result<IdentityBirthData, StepError> {
    let op = steps.get(index).and_then(|s| s.operation()).expect("step has an operation");
    op.execute(&data).await
}

fn with_keypair() -> IdentityBirthData {
    IdentityBirthData { keypair: Some(MockPubkyClient::keypair()),
                        ..Default::default() }
}

fn session() -> Session {
    Session { public_key: MOCK_PUBLIC_KEY.to_string(),
              capabilities: vec!["/pub/pubky.app/:rw".to_string()],
              homeserver: HOMESERVER.to_string() }
}

#[test]
fn builds_four_steps_in_order() {
    let (_, steps) = setup(None);
    assert_eq!(steps.ids(), vec!["generate-keypair", "create-recovery-file", "signup-to-homeserver", "verify-session"]);
    let titles: Vec<_> = steps.iter().map(|s| s.title().to_string()).collect();
    assert_eq!(titles, vec!["Generate Keypair", "Create Recovery File", "Signup to Homeserver", "Verify Session"]);
    assert!(steps.iter().all(|s| s.has_operation()));
}

#[tokio::test]
async fn generate_keypair_returns_only_the_keypair() {
    let (client, steps) = setup(None);
    let patch = run_step(&steps, 0, IdentityBirthData::default()).await.unwrap();

    assert_eq!(patch, IdentityBirthData { keypair: Some(Keypair { public_key: MOCK_PUBLIC_KEY.into(),
                                                                 secret_key: MOCK_SECRET_KEY.to_vec() }),
                                          ..Default::default() });
    assert_eq!(client.call_count(MockMethod::GenerateKeypair), 1);
}

#[tokio::test]
async fn generate_keypair_surfaces_client_failure() {
    let (client, steps) = setup(None);
    client.fail_next(MockMethod::GenerateKeypair, ClientError::Validation("Keypair generation failed".into()));
    let err = run_step(&steps, 0, IdentityBirthData::default()).await.unwrap_err();
    assert_eq!(err.message(), "Keypair generation failed");
}

#[tokio::test]
async fn recovery_file_requires_keypair() {
    let (client, steps) = setup(None);
    let err = run_step(&steps, 1, IdentityBirthData::default()).await.unwrap_err();
    assert_eq!(err.message(), "Keypair not found in accumulated data");
    assert_eq!(client.call_count(MockMethod::CreateRecoveryFile), 0);
}

#[tokio::test]
async fn recovery_file_uses_secret_key_and_generated_passphrase() {
    let (client, steps) = setup(None);
    let patch = run_step(&steps, 1, with_keypair()).await.unwrap();

    assert_eq!(patch.recovery_file, Some(MOCK_RECOVERY_FILE.to_vec()));
    let passphrase = patch.passphrase.clone().expect("passphrase returned");
    assert!(!passphrase.is_empty());
    assert_eq!(patch.keys(), vec!["passphrase".to_string(), "recoveryFile".to_string()]);
    assert_eq!(client.calls(), vec![ClientCall::CreateRecoveryFile { secret_key: MOCK_SECRET_KEY.to_vec(), passphrase }]);
}

#[tokio::test]
async fn signup_requires_keypair() {
    let (_, steps) = setup(None);
    let err = run_step(&steps, 2, IdentityBirthData::default()).await.unwrap_err();
    assert_eq!(err, StepError::missing("Keypair"));
}

#[tokio::test]
async fn signup_forwards_homeserver_and_token() {
    let (client, steps) = setup(Some("test-token-123"));
    let patch = run_step(&steps, 2, with_keypair()).await.unwrap();

    assert_eq!(patch, IdentityBirthData { session: Some(session()),
                                          ..Default::default() });
    assert_eq!(client.calls(), vec![ClientCall::Signup { secret_key: MOCK_SECRET_KEY.to_vec(),
                                                         homeserver: HOMESERVER.to_string(),
                                                         signup_token: Some("test-token-123".to_string()) }]);
}

#[tokio::test]
async fn signup_without_token_passes_none() {
    let (client, steps) = setup(None);
    run_step(&steps, 2, with_keypair()).await.unwrap();
    assert!(matches!(&client.calls()[0], ClientCall::Signup { signup_token: None, .. }));
}

#[tokio::test]
async fn signup_failures_keep_their_message() {
    let (client, steps) = setup(None);
    client.fail_next(MockMethod::Signup, ClientError::Authentication("Invalid signup token".into()));
    client.fail_next(MockMethod::Signup, ClientError::Pkarr("DHT publish failed".into()));

    assert_eq!(run_step(&steps, 2, with_keypair()).await.unwrap_err().message(), "Invalid signup token");
    assert_eq!(run_step(&steps, 2, with_keypair()).await.unwrap_err().message(), "DHT publish failed");
}

#[tokio::test]
async fn verify_requires_session() {
    let (_, steps) = setup(None);
    let err = run_step(&steps, 3, with_keypair()).await.unwrap_err();
    assert_eq!(err.message(), "Session not found in accumulated data");
}

#[tokio::test]
async fn verify_uses_public_key_from_session() {
    let (client, steps) = setup(None);
    let data = IdentityBirthData { session: Some(session()),
                                   ..Default::default() };
    let patch = run_step(&steps, 3, data).await.unwrap();

    assert_eq!(patch, IdentityBirthData { verified: Some(true),
                                          ..Default::default() });
    assert_eq!(client.calls(), vec![ClientCall::VerifySession { public_key: MOCK_PUBLIC_KEY.to_string() }]);
}

#[tokio::test]
async fn full_run_accumulates_every_result() {
    let (client, steps) = setup(None);
    let engine = SimulationEngine::new(steps);

    let state = engine.run_to_completion().await;

    assert_eq!(state.status, SimulationStatus::Complete);
    assert_eq!(state.current_step, 4);
    assert_eq!(state.data.keypair, Some(MockPubkyClient::keypair()));
    assert_eq!(state.data.recovery_file, Some(MOCK_RECOVERY_FILE.to_vec()));
    assert!(state.data.passphrase.is_some());
    assert_eq!(state.data.session, Some(session()));
    assert_eq!(state.data.verified, Some(true));
    assert_eq!(client.calls().len(), 4);
}

#[tokio::test]
async fn failed_signup_can_be_retried() {
    let (client, steps) = setup(None);
    client.fail_next(MockMethod::Signup, ClientError::Network("homeserver unreachable".into()));
    let engine = SimulationEngine::new(steps);

    engine.run_to_completion().await;
    assert_eq!(engine.status(), SimulationStatus::Error);
    assert_eq!(engine.current_step(), 2);
    assert!(engine.data().session.is_none());
    assert_eq!(engine.state().error_message().as_deref(), Some("homeserver unreachable"));

    engine.retry().await;
    assert_eq!(engine.current_step(), 3);
    engine.next().await;

    assert!(engine.is_finished());
    assert_eq!(engine.data().verified, Some(true));
    assert_eq!(client.call_count(MockMethod::Signup), 2);
}
