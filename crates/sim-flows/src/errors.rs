use serde::{Deserialize, Serialize};
use sim_core::StepError;
use thiserror::Error;

/// Errores que devuelven los clientes inyectados.
///
/// El engine no los clasifica; al cruzar a un step se normalizan a
/// `StepError::Operation` conservando el mensaje.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientError {
    /// Signup rechazado por el homeserver (token inválido, capacidades).
    #[error("{0}")]
    Authentication(String),
    /// Fallo publicando el registro pkarr en la DHT.
    #[error("{0}")]
    Pkarr(String),
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Validation(String),
}

impl ClientError {
    /// Nombre estable de la categoría, útil para trazas.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Authentication(_) => "authentication",
            ClientError::Pkarr(_) => "pkarr",
            ClientError::Network(_) => "network",
            ClientError::Validation(_) => "validation",
        }
    }
}

impl From<ClientError> for StepError {
    fn from(err: ClientError) -> Self {
        StepError::operation(err.to_string())
    }
}
