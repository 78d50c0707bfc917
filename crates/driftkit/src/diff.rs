//! Structural comparison of resource configs

use crate::types::{ConfigDiff, ConfigMap};
use serde_json::Value;
use std::collections::BTreeSet;

/// Recursive structural equality over JSON values.
///
/// Object key order never matters. Numbers compare by value, so `1` and
/// `1.0` are equal. Arrays compare element-wise and in order.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            if x == y {
                return true;
            }
            match (x.as_f64(), y.as_f64()) {
                (Some(fx), Some(fy)) => fx == fy,
                _ => false,
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => configs_equal(xs, ys),
        _ => false,
    }
}

/// Structural equality over two attribute maps.
pub fn configs_equal(a: &ConfigMap, b: &ConfigMap) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
}

/// Field-by-field diff over the union of keys of both maps.
///
/// A key present on one side only is always a difference, even when the
/// present value is `null`. Fields come out in key order.
pub fn diff_configs(terraform: &ConfigMap, actual: &ConfigMap) -> Vec<ConfigDiff> {
    let keys: BTreeSet<&String> = terraform.keys().chain(actual.keys()).collect();

    keys.into_iter()
        .filter_map(|key| {
            let tf_value = terraform.get(key);
            let actual_value = actual.get(key);
            let same = match (tf_value, actual_value) {
                (Some(x), Some(y)) => values_equal(x, y),
                _ => false,
            };
            (!same).then(|| ConfigDiff {
                field: key.clone(),
                terraform_value: tf_value.cloned(),
                actual_value: actual_value.cloned(),
            })
        })
        .collect()
}
