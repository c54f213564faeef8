//! Engine module for SimulationEngine implementation
//!
//! Provides the step-through engine and the state snapshot it publishes to
//! the presentation layer.

pub mod core;
mod state;

pub use self::core::SimulationEngine;
pub use state::SimulationState;
