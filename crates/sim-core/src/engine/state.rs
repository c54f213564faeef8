use serde::Serialize;

use crate::data::StepData;
use crate::errors::StepError;
use crate::step::SimulationStatus;

/// Vista que consume la capa de presentación.
///
/// `current_step` vive en `[0, total_steps]`; `total_steps` es la posición
/// "completado".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState<D: StepData> {
    pub current_step: usize,
    pub total_steps: usize,
    pub status: SimulationStatus,
    pub data: D,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StepError>,
}

impl<D: StepData> SimulationState<D> {
    /// Estado fresco: índice 0, `idle`, datos vacíos, sin error.
    pub fn initial(total_steps: usize) -> Self {
        Self { current_step: 0,
               total_steps,
               status: SimulationStatus::Idle,
               data: D::default(),
               error: None }
    }

    pub fn is_finished(&self) -> bool {
        self.current_step >= self.total_steps
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(StepError::message)
    }
}
