//! Macro para declarar registros tipados de datos acumulados.
//!
//! Exportada en la raíz del crate:
//!   use sim_core::step_data;
//!
//! Cada campo declarado se convierte en `Option<T>`; un step devuelve el mismo
//! tipo con sólo sus campos en `Some` y `merge` sobreescribe exactamente esos.

/// Declara un struct de datos acumulados con derives serde (camelCase) e
/// implementación de `StepData`.
///
/// ```ignore
/// step_data! {
///     pub struct MyData {
///         pub keypair: Keypair,
///         pub verified: bool,
///     }
/// }
/// ```
#[macro_export]
macro_rules! step_data {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $fname:ident : $fty:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                #[serde(default, skip_serializing_if = "Option::is_none")]
                $fvis $fname: Option<$fty>,
            )+
        }

        impl $crate::data::StepData for $name {
            fn merge(&mut self, patch: Self) {
                $(
                    if let Some(v) = patch.$fname {
                        self.$fname = Some(v);
                    }
                )+
            }
        }
    };
}
