use std::collections::HashSet;
use std::sync::Arc;

use crate::data::StepData;
use crate::errors::SimulationError;

use super::Step;

/// Secuencia ordenada de steps, fija desde su construcción.
///
/// Invariante: los ids son no vacíos y únicos dentro del set.
#[derive(Debug)]
pub struct StepSet<D: StepData> {
    steps: Arc<[Step<D>]>,
}

impl<D: StepData> StepSet<D> {
    pub fn new(steps: Vec<Step<D>>) -> Result<Self, SimulationError> {
        let mut seen = HashSet::with_capacity(steps.len());
        for s in &steps {
            if s.id().is_empty() {
                return Err(SimulationError::EmptyStepId);
            }
            if !seen.insert(s.id()) {
                return Err(SimulationError::DuplicateStepId(s.id().to_string()));
            }
        }
        Ok(Self { steps: steps.into() })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step<D>> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step<D>> {
        self.steps.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.id()).collect()
    }
}

impl<D: StepData> Clone for StepSet<D> {
    fn clone(&self) -> Self {
        Self { steps: Arc::clone(&self.steps) }
    }
}

impl<'a, D: StepData> IntoIterator for &'a StepSet<D> {
    type Item = &'a Step<D>;
    type IntoIter = std::slice::Iter<'a, Step<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::JsonData;

    #[test]
    fn rejects_duplicate_ids() {
        let res = StepSet::<JsonData>::new(vec![Step::marker("a", "A"), Step::marker("a", "Again")]);
        assert_eq!(res.unwrap_err(), SimulationError::DuplicateStepId("a".into()));
    }

    #[test]
    fn rejects_empty_id() {
        let res = StepSet::<JsonData>::new(vec![Step::marker("", "blank")]);
        assert_eq!(res.unwrap_err(), SimulationError::EmptyStepId);
    }

    #[test]
    fn keeps_declared_order() {
        let set = StepSet::<JsonData>::new(vec![Step::marker("one", "1"), Step::marker("two", "2"), Step::marker("three", "3")]).unwrap();
        assert_eq!(set.ids(), vec!["one", "two", "three"]);
        assert_eq!(set.len(), 3);
        assert!(!set.get(0).unwrap().has_operation());
    }
}
