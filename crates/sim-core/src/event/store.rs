use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use super::{SimulationEvent, SimulationEventKind};

/// Almacenamiento de eventos append-only.
///
/// Toma `&self` porque el engine expone sus acciones sobre referencias
/// compartidas; cada implementación resuelve su propia sincronización.
pub trait EventStore: Send + Sync {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&self, run_id: Uuid, kind: SimulationEventKind) -> SimulationEvent;
    /// Lista eventos de un run (orden ascendente por seq).
    fn list(&self, run_id: Uuid) -> Vec<SimulationEvent>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: Mutex<HashMap<Uuid, Vec<SimulationEvent>>>,
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&self, run_id: Uuid, kind: SimulationEventKind) -> SimulationEvent {
        let mut inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let vec = inner.entry(run_id).or_default();
        let ev = SimulationEvent { seq: vec.len() as u64,
                                   run_id,
                                   kind,
                                   ts: Utc::now() };
        vec.push(ev.clone());
        ev
    }

    fn list(&self, run_id: Uuid) -> Vec<SimulationEvent> {
        let inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        inner.get(&run_id).cloned().unwrap_or_default()
    }
}
