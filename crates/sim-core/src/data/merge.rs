//! Merge shallow para datos acumulados representados como mapa JSON.
//!
//! Las claves del parche reemplazan a las existentes; las demás se mantienen.
//! No se hace deep-merge: un objeto anidado en el parche reemplaza al objeto
//! completo.

use serde_json::{Map, Value};

/// Merge shallow in-place: keys from `patch` override keys in `base`.
pub fn merge_map(base: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (k, v) in patch {
        base.insert(k, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn merge_shallow_overrides_keys() {
        let mut base = as_map(json!({"x": 1, "y": {"z": 3}, "keep": "a"}));
        merge_map(&mut base, as_map(json!({"x": 2, "y": "replaced", "new": true})));

        assert_eq!(base["x"], json!(2));
        // un valor no-objeto reemplaza completamente
        assert_eq!(base["y"], json!("replaced"));
        assert_eq!(base["keep"], json!("a"));
        assert_eq!(base["new"], json!(true));
    }

    #[test]
    fn nested_objects_are_not_deep_merged() {
        let mut base = as_map(json!({"y": {"a": 1, "b": 2}}));
        merge_map(&mut base, as_map(json!({"y": {"a": 9}})));
        assert_eq!(Value::Object(base), json!({"y": {"a": 9}}));
    }
}
