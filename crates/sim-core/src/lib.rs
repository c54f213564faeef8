//! sim-core: motor de simulación paso a paso.
//!
//! Un `StepSet` fijo se ejecuta secuencialmente sobre un acumulado de datos;
//! el `SimulationEngine` expone `next`, `previous`, `reset` y `retry` y
//! publica su estado para la capa de presentación.
pub mod data;
pub mod engine;
pub mod errors;
pub mod event;
pub mod step;

pub use data::{merge_map, JsonData, StepData};
pub use engine::{SimulationEngine, SimulationState};
pub use errors::{SimulationError, StepError};
pub use event::{EventStore, InMemoryEventStore, SimulationEvent, SimulationEventKind};
pub use step::{SimulationStatus, Step, StepOperation, StepSet};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(value: serde_json::Value) -> JsonData {
        match value {
            serde_json::Value::Object(m) => m,
            _ => JsonData::new(),
        }
    }

    #[tokio::test]
    async fn marker_steps_advance_without_touching_status() {
        let steps = StepSet::new(vec![Step::<JsonData>::marker("a", "A"), Step::marker("b", "B"), Step::marker("c", "C")]).unwrap();
        let engine = SimulationEngine::new(steps);

        engine.next().await;
        engine.next().await;
        engine.next().await;

        assert_eq!(engine.current_step(), 3);
        assert_eq!(engine.status(), SimulationStatus::Idle);
        assert!(engine.is_finished());
        assert!(engine.current_step_descriptor().is_none());
    }

    #[tokio::test]
    async fn event_log_follows_transitions() {
        let steps = StepSet::new(vec![Step::marker("intro", "Intro"),
                                      Step::new("work", "Work", |_d: JsonData| async { Ok::<_, StepError>(patch(json!({"done": true}))) })]).unwrap();
        let engine = SimulationEngine::new(steps);

        engine.run_to_completion().await;
        engine.previous();

        let kinds: Vec<_> = engine.events().into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds.len(), 4);
        assert!(matches!(&kinds[0], SimulationEventKind::Advanced { step_index: 0, .. }));
        assert!(matches!(&kinds[1], SimulationEventKind::StepStarted { step_id, .. } if step_id == "work"));
        assert!(matches!(&kinds[2], SimulationEventKind::StepFinished { keys, .. } if keys == &vec!["done".to_string()]));
        assert!(matches!(kinds[3], SimulationEventKind::Rewound { from: 2, to: 1 }));

        // reset abre un run nuevo cuyo primer evento referencia al anterior
        let old_run = engine.run_id();
        engine.reset();
        assert_ne!(engine.run_id(), old_run);
        let events = engine.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0].kind, SimulationEventKind::Reset { previous_run } if previous_run == old_run));
    }
}
