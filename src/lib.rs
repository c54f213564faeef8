//! Pubkytecture
//!
//! Este crate actúa como la librería central de la simulación:
//! - Re-exporta `sim_core` (motor paso a paso) y `sim_flows` (step sets Pubky).
//! - Expone `config` para armar la configuración que se inyecta en los flujos.
//! - Expone `errors` para los errores de la aplicación.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes (por ejemplo una
//! capa de presentación que lea el estado del engine).

pub mod config;
pub mod errors;

pub use sim_core;
pub use sim_flows;

pub use config::AppConfig;
pub use errors::CoreError;
