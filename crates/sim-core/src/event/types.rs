//! Tipos de evento de la simulación y estructura `SimulationEvent`.
//!
//! Cada acción efectiva del engine (las no-op no emiten nada) agrega un
//! evento al `EventStore`. El log es sólo en memoria y se descarta con la
//! sesión; sirve para trazas y para que la presentación muestre un historial.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StepError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationEventKind {
    /// Avance sobre un step sin operación.
    Advanced { step_index: usize, step_id: String },
    /// Una operación comenzó. No implica éxito.
    StepStarted { step_index: usize, step_id: String },
    /// La operación terminó y su parche se fusionó; lista las claves aportadas.
    StepFinished { step_index: usize, step_id: String, keys: Vec<String> },
    /// La operación falló; índice y datos quedan intactos.
    StepFailed { step_index: usize, step_id: String, error: StepError },
    /// `retry` aceptado sobre el step que falló.
    RetryRequested { step_index: usize, step_id: String },
    /// Navegación hacia atrás (sólo vista).
    Rewound { from: usize, to: usize },
    /// Vuelta al estado inicial; abre un nuevo run.
    Reset { previous_run: Uuid },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationEvent {
    pub seq: u64, // asignado por el store (orden append)
    pub run_id: Uuid,
    pub kind: SimulationEventKind,
    pub ts: DateTime<Utc>,
}
