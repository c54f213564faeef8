//! Definiciones relacionadas a Steps.
//!
//! Un Step es un descriptor inmutable (id, título y una operación asíncrona
//! opcional). Este módulo define:
//! - `Step` y `StepOperation`: la unidad de trabajo y su operación.
//! - `StepSet`: la secuencia ordenada que consume el engine.
//! - `SimulationStatus`: el estado observable del engine.

mod definition;
mod set;
mod status;

pub use definition::{Step, StepOperation};
pub use set::StepSet;
pub use status::SimulationStatus;
