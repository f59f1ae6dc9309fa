// Structural JSON comparison: object member order is ignored and numbers
// compare by value, so `0` and `0.0` are equal.
use super::path::FieldPath;
use serde_json::{Number, Value};

pub fn json_equivalent(left: &Value, right: &Value) -> bool {
    first_difference(left, right).is_none()
}

/// Path of the first location where the two documents disagree.
pub fn first_difference(left: &Value, right: &Value) -> Option<FieldPath> {
    diff_at(left, right, &FieldPath::root())
}

fn diff_at(left: &Value, right: &Value, path: &FieldPath) -> Option<FieldPath> {
    match (left, right) {
        (Value::Null, Value::Null) => None,
        (Value::Bool(a), Value::Bool(b)) if a == b => None,
        (Value::Number(a), Value::Number(b)) if numbers_equal(a, b) => None,
        (Value::String(a), Value::String(b)) if a == b => None,
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return Some(path.clone());
            }
            a.iter()
                .zip(b)
                .enumerate()
                .find_map(|(index, (x, y))| diff_at(x, y, &path.index(index)))
        }
        (Value::Object(a), Value::Object(b)) => {
            if let Some(key) = b.keys().find(|key| !a.contains_key(*key)) {
                return Some(path.key(key));
            }
            a.iter().find_map(|(key, x)| match b.get(key) {
                Some(y) => diff_at(x, y, &path.key(key)),
                None => Some(path.key(key)),
            })
        }
        _ => Some(path.clone()),
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{first_difference, json_equivalent};
    use serde_json::json;

    #[test]
    fn member_order_is_ignored() {
        let a = json!({"a": 1, "b": {"x": [1, 2], "y": "z"}});
        let b: serde_json::Value =
            serde_json::from_str(r#"{"b":{"y":"z","x":[1,2]},"a":1}"#).expect("json");
        assert!(json_equivalent(&a, &b));
    }

    #[test]
    fn integer_and_float_forms_compare_by_value() {
        assert!(json_equivalent(&json!({"geo_lat": 0}), &json!({"geo_lat": 0.0})));
        assert!(json_equivalent(&json!(-1), &json!(-1.0)));
        assert!(!json_equivalent(&json!(1), &json!(1.5)));
    }

    #[test]
    fn array_order_matters() {
        assert!(!json_equivalent(&json!([1, 2]), &json!([2, 1])));
    }

    #[test]
    fn sentinel_string_is_not_an_empty_array() {
        let diff = first_difference(&json!({"cameras": "-1"}), &json!({"cameras": []}));
        assert_eq!(diff.map(|path| path.to_string()), Some("cameras".to_string()));
    }

    #[test]
    fn extra_or_missing_keys_are_reported() {
        let diff = first_difference(&json!({"a": 1}), &json!({"a": 1, "b": 2}));
        assert_eq!(diff.map(|path| path.to_string()), Some("b".to_string()));

        let diff = first_difference(&json!({"a": 1, "c": 3}), &json!({"a": 1}));
        assert_eq!(diff.map(|path| path.to_string()), Some("c".to_string()));
    }

    #[test]
    fn nested_difference_path_includes_index() {
        let left = json!({"io_modules": [{"port": 1}, {"port": 2}]});
        let right = json!({"io_modules": [{"port": 1}, {"port": 3}]});
        let diff = first_difference(&left, &right).expect("diff");
        assert_eq!(diff.to_string(), "io_modules[1].port");
    }
}
