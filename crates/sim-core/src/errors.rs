//! Errores del core de simulación.
//!
//! `StepError` es el valor que el engine registra cuando un step falla; nunca
//! sale de las acciones del engine como `Err`. `SimulationError` sólo aparece
//! al construir un `StepSet`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepError {
    /// Un step posterior se ejecutó sin el dato que produce un step previo.
    #[error("{what} not found in accumulated data")]
    MissingData { what: String },
    /// Fallo reportado por el cliente inyectado (red, validación, dominio).
    #[error("{message}")]
    Operation { message: String },
}

impl StepError {
    pub fn missing(what: impl Into<String>) -> Self {
        StepError::MissingData { what: what.into() }
    }

    pub fn operation(message: impl Into<String>) -> Self {
        StepError::Operation { message: message.into() }
    }

    /// Mensaje legible que muestra la capa de presentación.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<String> for StepError {
    fn from(message: String) -> Self {
        StepError::Operation { message }
    }
}

impl From<&str> for StepError {
    fn from(message: &str) -> Self {
        StepError::Operation { message: message.to_string() }
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SimulationError {
    #[error("duplicate step id: {0}")] DuplicateStepId(String),
    #[error("step id must not be empty")] EmptyStepId,
}
