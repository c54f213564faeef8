//! Datos acumulados a lo largo de una simulación.
//!
//! Cada step exitoso devuelve un parche parcial que se fusiona (shallow) en el
//! acumulado. El engine es el único dueño del acumulado; ningún otro
//! componente lo muta.

pub mod macros;
mod merge;

use std::fmt::Debug;

use serde::Serialize;
use serde_json::{Map, Value};

pub use merge::merge_map;

/// Contrato de datos acumulados: `merge` aplica un parche parcial.
///
/// Los campos/claves presentes en `patch` sobreescriben a los existentes y
/// todo lo demás persiste. Nunca se elimina información.
pub trait StepData: Clone + Default + Debug + Serialize + Send + Sync + 'static {
    fn merge(&mut self, patch: Self);

    /// Claves de primer nivel presentes en este valor (para trazas y eventos).
    fn keys(&self) -> Vec<String> {
        match serde_json::to_value(self) {
            Ok(Value::Object(m)) => m.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// Mapa abierto `clave -> valor` para flujos no tipados.
pub type JsonData = Map<String, Value>;

impl StepData for JsonData {
    fn merge(&mut self, patch: Self) {
        merge_map(self, patch);
    }
}
