use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::data::StepData;
use crate::errors::StepError;

/// Operación asíncrona de un step.
///
/// Recibe una vista de sólo lectura del acumulado y devuelve un parche
/// parcial con las claves que produce. No debe re-devolver las entradas que
/// sólo leyó.
#[async_trait]
pub trait StepOperation<D: StepData>: Send + Sync {
    async fn execute(&self, data: &D) -> Result<D, StepError>;
}

/// Cualquier closure `Fn(D) -> Future` sirve como operación; recibe una copia
/// propia del acumulado.
#[async_trait]
impl<D, F, Fut> StepOperation<D> for F
    where D: StepData,
          F: Fn(D) -> Fut + Send + Sync,
          Fut: Future<Output = Result<D, StepError>> + Send + 'static
{
    async fn execute(&self, data: &D) -> Result<D, StepError> {
        (self)(data.clone()).await
    }
}

/// Descriptor inmutable de un step.
pub struct Step<D: StepData> {
    id: String,
    title: String,
    operation: Option<Arc<dyn StepOperation<D>>>,
}

impl<D: StepData> Step<D> {
    /// Step respaldado por una operación.
    pub fn new(id: impl Into<String>, title: impl Into<String>, operation: impl StepOperation<D> + 'static) -> Self {
        Self { id: id.into(),
               title: title.into(),
               operation: Some(Arc::new(operation)) }
    }

    /// Step sin operación: sólo marca de navegación.
    pub fn marker(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(),
               title: title.into(),
               operation: None }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn has_operation(&self) -> bool {
        self.operation.is_some()
    }

    pub fn operation(&self) -> Option<Arc<dyn StepOperation<D>>> {
        self.operation.clone()
    }
}

impl<D: StepData> Clone for Step<D> {
    fn clone(&self) -> Self {
        Self { id: self.id.clone(),
               title: self.title.clone(),
               operation: self.operation.clone() }
    }
}

impl<D: StepData> fmt::Debug for Step<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
         .field("id", &self.id)
         .field("title", &self.title)
         .field("has_operation", &self.has_operation())
         .finish()
    }
}
