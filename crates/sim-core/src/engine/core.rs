//! Core SimulationEngine implementation

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::data::StepData;
use crate::engine::SimulationState;
use crate::errors::StepError;
use crate::event::{EventStore, InMemoryEventStore, SimulationEvent, SimulationEventKind};
use crate::step::{SimulationStatus, Step, StepOperation, StepSet};

/// Resultado de reclamar una transición de forma atómica sobre el estado.
enum Claim<D> {
    Busy,
    Ignored(&'static str),
    Advanced { index: usize },
    Run { index: usize, data: D },
}

/// Motor de simulación paso a paso.
///
/// Orquesta la ejecución secuencial de un `StepSet`: una sola operación en
/// vuelo por instancia, navegación hacia atrás sólo de vista, reset y retry
/// tras error. Las acciones nunca fallan; los errores de las operaciones
/// quedan registrados en el estado.
///
/// El estado vive en un canal `watch` para que la presentación pueda observar
/// `loading` mientras una operación está pendiente.
pub struct SimulationEngine<D: StepData, E: EventStore = InMemoryEventStore> {
    steps: StepSet<D>,
    state: watch::Sender<SimulationState<D>>,
    run_id: Mutex<Uuid>,
    // Operación pendiente; independiente del status, que `previous`/`reset` reescriben.
    in_flight: AtomicBool,
    event_store: E,
}

impl<D: StepData> SimulationEngine<D> {
    /// Crea un engine con el store de eventos en memoria.
    pub fn new(steps: StepSet<D>) -> Self {
        Self::new_with_store(steps, InMemoryEventStore::default())
    }
}

impl<D: StepData, E: EventStore> SimulationEngine<D, E> {
    pub fn new_with_store(steps: StepSet<D>, event_store: E) -> Self {
        let (state, _rx) = watch::channel(SimulationState::initial(steps.len()));
        Self { steps,
               state,
               run_id: Mutex::new(Uuid::new_v4()),
               in_flight: AtomicBool::new(false),
               event_store }
    }

    // ---- lecturas ----

    /// Copia del estado actual.
    pub fn state(&self) -> SimulationState<D> {
        self.state.borrow().clone()
    }

    pub fn current_step(&self) -> usize {
        self.state.borrow().current_step
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn status(&self) -> SimulationStatus {
        self.state.borrow().status
    }

    pub fn data(&self) -> D {
        self.state.borrow().data.clone()
    }

    pub fn error(&self) -> Option<StepError> {
        self.state.borrow().error.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.state.borrow().is_finished()
    }

    /// Step en el índice actual; `None` en la posición "completado".
    pub fn current_step_descriptor(&self) -> Option<&Step<D>> {
        self.steps.get(self.current_step())
    }

    pub fn steps(&self) -> &StepSet<D> {
        &self.steps
    }

    /// Receptor que se notifica en cada cambio de estado.
    pub fn subscribe(&self) -> watch::Receiver<SimulationState<D>> {
        self.state.subscribe()
    }

    /// `true` mientras una operación está en ejecución, aunque la vista haya
    /// retrocedido o se haya reiniciado.
    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn run_id(&self) -> Uuid {
        *self.run_id.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Eventos del run actual.
    pub fn events(&self) -> Vec<SimulationEvent> {
        self.event_store.list(self.run_id())
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    // ---- acciones ----

    /// Avanza un paso.
    ///
    /// Sin operación: incrementa el índice y conserva el status. Con
    /// operación: `loading`, ejecuta con el acumulado actual y, según el
    /// resultado, fusiona y avanza (`complete`) o registra el error (`error`).
    /// Se ignora mientras haya una operación en vuelo, aunque `previous` o
    /// `reset` hayan dejado el status en `idle`.
    pub async fn next(&self) {
        let total = self.steps.len();
        let steps = &self.steps;
        let mut claim = Claim::Ignored("already at completed position");
        self.state.send_if_modified(|s| {
                      if self.in_flight() {
                          claim = Claim::Busy;
                          return false;
                      }
                      if s.current_step >= total {
                          return false;
                      }
                      let index = s.current_step;
                      match steps.get(index) {
                          Some(step) if step.has_operation() => {
                              s.status = SimulationStatus::Loading;
                              s.error = None;
                              self.in_flight.store(true, Ordering::Release);
                              claim = Claim::Run { index, data: s.data.clone() };
                          }
                          _ => {
                              s.current_step = index + 1;
                              claim = Claim::Advanced { index };
                          }
                      }
                      true
                  });
        self.dispatch("next", claim).await;
    }

    /// Retrocede un paso (sólo vista): `idle`, sin error, datos intactos.
    pub fn previous(&self) {
        let mut moved = None;
        self.state.send_if_modified(|s| {
                      if s.current_step == 0 {
                          return false;
                      }
                      moved = Some((s.current_step, s.current_step - 1));
                      s.current_step -= 1;
                      s.status = SimulationStatus::Idle;
                      s.error = None;
                      true
                  });
        match moved {
            Some((from, to)) => {
                debug!(from, to, "rewound");
                self.record(SimulationEventKind::Rewound { from, to });
            }
            None => debug!("previous ignored at step 0"),
        }
    }

    /// Vuelve al estado inicial sin importar el estado actual y abre un run nuevo.
    pub fn reset(&self) {
        let total = self.steps.len();
        self.state.send_modify(|s| *s = SimulationState::initial(total));
        let previous_run = {
            let mut run_id = self.run_id.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::replace(&mut *run_id, Uuid::new_v4())
        };
        debug!(%previous_run, "simulation reset");
        self.record(SimulationEventKind::Reset { previous_run });
    }

    /// Reintenta el step que falló, sólo si el status es exactamente `error`.
    pub async fn retry(&self) {
        let steps = &self.steps;
        let mut claim = Claim::Ignored("status is not error");
        self.state.send_if_modified(|s| {
                      if self.in_flight() {
                          claim = Claim::Busy;
                          return false;
                      }
                      if !s.status.is_error() {
                          return false;
                      }
                      let index = s.current_step;
                      match steps.get(index) {
                          Some(step) if step.has_operation() => {
                              s.status = SimulationStatus::Loading;
                              s.error = None;
                              self.in_flight.store(true, Ordering::Release);
                              claim = Claim::Run { index, data: s.data.clone() };
                              true
                          }
                          _ => {
                              claim = Claim::Ignored("failed step has no operation");
                              false
                          }
                      }
                  });
        if let Claim::Run { index, .. } = &claim {
            if let Some(step) = self.steps.get(*index) {
                self.record(SimulationEventKind::RetryRequested { step_index: *index,
                                                                  step_id: step.id().to_string() });
            }
        }
        self.dispatch("retry", claim).await;
    }

    /// Ejecuta hasta `n` pasos; se detiene en la posición final o ante error.
    pub async fn run_n(&self, n: usize) -> SimulationStatus {
        for _ in 0..n {
            {
                let s = self.state.borrow();
                if s.is_finished() || s.status.is_error() || self.in_flight() {
                    break;
                }
            }
            self.next().await;
        }
        self.status()
    }

    /// Ejecuta pasos hasta completar el set o hasta el primer error.
    pub async fn run_to_completion(&self) -> SimulationState<D> {
        loop {
            {
                let s = self.state.borrow();
                if s.is_finished() || s.status.is_error() || self.in_flight() {
                    break;
                }
            }
            self.next().await;
        }
        let state = self.state();
        if state.is_finished() {
            info!(run_id = %self.run_id(), steps = state.total_steps, "simulation completed");
        }
        state
    }

    // ---- internos ----

    async fn dispatch(&self, action: &'static str, claim: Claim<D>) {
        match claim {
            Claim::Busy => warn!(action, "action ignored: operation in flight"),
            Claim::Ignored(reason) => debug!(action, reason, "action ignored"),
            Claim::Advanced { index } => {
                if let Some(step) = self.steps.get(index) {
                    debug!(step_index = index, step_id = step.id(), "advanced over marker step");
                    self.record(SimulationEventKind::Advanced { step_index: index,
                                                                step_id: step.id().to_string() });
                }
            }
            Claim::Run { index, data } => {
                let Some((step, op)) = self.steps.get(index).and_then(|s| s.operation().map(|op| (s, op))) else {
                    self.in_flight.store(false, Ordering::Release);
                    return;
                };
                self.execute(index, step.id(), op, data).await;
            }
        }
    }

    async fn execute(&self, index: usize, step_id: &str, op: Arc<dyn StepOperation<D>>, data: D) {
        self.record(SimulationEventKind::StepStarted { step_index: index,
                                                       step_id: step_id.to_string() });
        let span = info_span!("step", step_index = index, step_id);
        let result = async {
                         debug!("executing step operation");
                         op.execute(&data).await
                     }.instrument(span)
                      .await;

        match result {
            Ok(patch) => {
                let keys = patch.keys();
                self.state.send_modify(|s| {
                              s.data.merge(patch);
                              s.status = SimulationStatus::Complete;
                              s.current_step = index + 1;
                              self.in_flight.store(false, Ordering::Release);
                          });
                debug!(step_index = index, step_id, ?keys, "step finished");
                self.record(SimulationEventKind::StepFinished { step_index: index,
                                                                step_id: step_id.to_string(),
                                                                keys });
            }
            Err(error) => {
                warn!(step_index = index, step_id, error = %error, "step failed");
                self.state.send_modify(|s| {
                              s.status = SimulationStatus::Error;
                              s.error = Some(error.clone());
                              self.in_flight.store(false, Ordering::Release);
                          });
                self.record(SimulationEventKind::StepFailed { step_index: index,
                                                              step_id: step_id.to_string(),
                                                              error });
            }
        }
    }

    fn record(&self, kind: SimulationEventKind) {
        let _ = self.event_store.append_kind(self.run_id(), kind);
    }
}

impl<D: StepData, E: EventStore> fmt::Debug for SimulationEngine<D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("SimulationEngine")
         .field("run_id", &self.run_id())
         .field("current_step", &s.current_step)
         .field("total_steps", &s.total_steps)
         .field("status", &s.status)
         .finish()
    }
}
