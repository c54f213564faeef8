use std::fmt;

use serde::{Deserialize, Serialize};

/// Estado observable de la simulación.
///
/// Transiciones válidas:
/// - `Idle` / `Complete` -> `Loading` (step con operación)
/// - `Loading` -> `Complete` | `Error`
/// - `Error` -> `Loading` (retry)
/// - cualquiera -> `Idle` (previous / reset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationStatus {
    /// Sin operación en curso.
    #[default]
    Idle,
    /// Una operación está en vuelo.
    Loading,
    /// La última operación terminó correctamente.
    Complete,
    /// La última operación falló; se admite `retry`.
    Error,
}

impl SimulationStatus {
    pub fn is_loading(self) -> bool {
        matches!(self, SimulationStatus::Loading)
    }

    pub fn is_error(self) -> bool {
        matches!(self, SimulationStatus::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SimulationStatus::Idle => "idle",
            SimulationStatus::Loading => "loading",
            SimulationStatus::Complete => "complete",
            SimulationStatus::Error => "error",
        }
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
