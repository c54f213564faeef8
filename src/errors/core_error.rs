use sim_core::SimulationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Error interno: {0}")]
    Internal(String),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error construyendo la simulación: {0}")]
    Simulation(#[from] SimulationError),
    #[error("Error serializando estado: {0}")]
    Json(#[from] serde_json::Error),
}
