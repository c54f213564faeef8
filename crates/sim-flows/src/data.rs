//! Registros tipados de datos acumulados para cada step set.
//!
//! Todos los campos son opcionales: cada step devuelve un registro con sólo
//! sus claves en `Some` y el engine lo fusiona sobre el acumulado.

use serde::{Deserialize, Serialize};
use sim_core::step_data;

/// Par de claves Ed25519. `public_key` va codificada en z-base-32.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keypair {
    pub public_key: String,
    pub secret_key: Vec<u8>,
}

/// Sesión obtenida tras el signup en el homeserver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub public_key: String,
    /// Por ejemplo `"/pub/pubky.app/:rw"`.
    pub capabilities: Vec<String>,
    pub homeserver: String,
}

step_data! {
    /// Acumulado del flujo Identity Birth.
    pub struct IdentityBirthData {
        pub keypair: Keypair,
        /// Archivo de recuperación cifrado.
        pub recovery_file: Vec<u8>,
        pub passphrase: String,
        pub session: Session,
        pub verified: bool,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Milisegundos desde epoch.
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResult {
    /// `pubky://<public-key>/pub/...`
    pub uri: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexResult {
    pub indexed: bool,
    pub nexus_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    pub discovered_by: Vec<String>,
    pub timestamp: i64,
}

step_data! {
    /// Acumulado del flujo Post Journey.
    pub struct PostJourneyData {
        pub post: Post,
        pub publish_result: PublishResult,
        pub index_result: IndexResult,
        pub discovery_result: DiscoveryResult,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sim_core::StepData;

    #[test]
    fn identity_data_serializes_like_the_open_mapping() {
        let data = IdentityBirthData { recovery_file: Some(vec![5, 6]),
                                       passphrase: Some("pass".into()),
                                       ..Default::default() };
        assert_eq!(serde_json::to_value(&data).unwrap(), json!({"recoveryFile": [5, 6], "passphrase": "pass"}));
    }

    #[test]
    fn post_data_merge_keeps_earlier_results() {
        let mut acc = PostJourneyData { post: Some(Post { content: "hi".into(),
                                                          image_url: None,
                                                          timestamp: 1 }),
                                        ..Default::default() };
        acc.merge(PostJourneyData { publish_result: Some(PublishResult { uri: "pubky://x/pub/p".into(),
                                                                         timestamp: 2 }),
                                    ..Default::default() });
        assert!(acc.post.is_some());
        assert_eq!(acc.publish_result.as_ref().map(|p| p.timestamp), Some(2));
        assert_eq!(acc.keys(), vec!["post".to_string(), "publishResult".to_string()]);
    }
}
