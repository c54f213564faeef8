//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) en un `AppConfig` explícito que se pasa
//! a los constructores de flujos. No hay configuración global: quien arma la
//! simulación decide de dónde sale cada valor.
use std::env;
use std::sync::Arc;
use std::time::Duration;

use sim_flows::{IdentityBirthConfig, Post, PostJourneyClient, PostJourneyConfig, PubkyClient};

use crate::errors::CoreError;

/// Homeserver de demostración (clave pública z-base-32).
pub const DEFAULT_HOMESERVER: &str = "8um71us3fyw6h8wbcxb5ar3rwusy1a6u49956ikzojg3gcwd1dty";

/// Configuración de la aplicación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub homeserver: String,
    /// Token de signup opcional (cadena vacía equivale a ausente).
    pub signup_token: Option<String>,
    /// Latencia artificial de los clientes mock.
    pub mock_latency: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { homeserver: DEFAULT_HOMESERVER.to_string(),
               signup_token: None,
               mock_latency: Duration::ZERO }
    }
}

impl AppConfig {
    /// Lee `.env` si existe y luego las variables de proceso.
    pub fn from_env() -> Result<Self, CoreError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda de claves.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mock_latency = match non_empty("SIM_MOCK_LATENCY_MS") {
            Some(raw) => {
                let ms = raw.parse::<u64>()
                            .map_err(|e| CoreError::Config(format!("SIM_MOCK_LATENCY_MS inválido ({raw}): {e}")))?;
                Duration::from_millis(ms)
            }
            None => defaults.mock_latency,
        };

        Ok(Self { homeserver: non_empty("PUBKY_HOMESERVER").unwrap_or(defaults.homeserver),
                  signup_token: non_empty("PUBKY_SIGNUP_TOKEN"),
                  mock_latency })
    }

    pub fn identity_birth(&self, client: Arc<dyn PubkyClient>) -> IdentityBirthConfig {
        IdentityBirthConfig { homeserver: self.homeserver.clone(),
                              signup_token: self.signup_token.clone(),
                              client }
    }

    pub fn post_journey(&self, post: Post, secret_key: Vec<u8>, client: Arc<dyn PostJourneyClient>) -> PostJourneyConfig {
        PostJourneyConfig { post,
                            secret_key,
                            homeserver: self.homeserver.clone(),
                            client }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn reads_overrides_and_ignores_blank_token() {
        let cfg = AppConfig::from_lookup(lookup(&[("PUBKY_HOMESERVER", "hs-z32"),
                                                  ("PUBKY_SIGNUP_TOKEN", "  "),
                                                  ("SIM_MOCK_LATENCY_MS", "150")])).unwrap();
        assert_eq!(cfg.homeserver, "hs-z32");
        assert_eq!(cfg.signup_token, None);
        assert_eq!(cfg.mock_latency, Duration::from_millis(150));
    }

    #[test]
    fn invalid_latency_is_a_config_error() {
        let err = AppConfig::from_lookup(lookup(&[("SIM_MOCK_LATENCY_MS", "soon")])).unwrap_err();
        assert!(matches!(err, CoreError::Config(msg) if msg.contains("SIM_MOCK_LATENCY_MS")));
    }

    #[test]
    fn flow_configs_carry_homeserver_and_token() {
        let cfg = AppConfig { signup_token: Some("tok".into()),
                              ..AppConfig::default() };
        let identity = cfg.identity_birth(Arc::new(sim_flows::MockPubkyClient::new()));
        assert_eq!(identity.homeserver, DEFAULT_HOMESERVER);
        assert_eq!(identity.signup_token.as_deref(), Some("tok"));
    }
}
