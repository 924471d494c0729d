/*
 * Copyright 2019-2021 Wren Powell
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use serde_json::{Map, Number, Value};

/// The whole JSON object persisted by a store.
///
/// Field order is preserved, so a document is written back in the order its fields were read or
/// inserted.
pub type Document = Map<String, Value>;

/// Return an independent copy of `document`.
///
/// Every mutation of a store operates on a snapshot produced by this function, so the caller's
/// document and the store's cached document never alias one another.
pub fn snapshot(document: &Document) -> Document {
    document.clone()
}

/// Return whether two documents are structurally equal.
///
/// Two documents are equal if they have the same set of keys at every level and the corresponding
/// values are equal. Field order is not significant.
pub fn documents_equal(left: &Document, right: &Document) -> bool {
    left.len() == right.len()
        && left.iter().all(|(key, left_value)| match right.get(key) {
            Some(right_value) => values_equal(left_value, right_value),
            None => false,
        })
}

/// Return whether two JSON values are structurally equal.
///
/// Objects are compared with [`documents_equal`], arrays element by element, and primitives by
/// value. Numbers are compared numerically, so `1` equals `1.0`.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Object(left), Value::Object(right)) => documents_equal(left, right),
        (Value::Number(left), Value::Number(right)) => numbers_equal(left, right),
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|(left, right)| values_equal(left, right))
        }
        (left, right) => left == right,
    }
}

/// Return whether two JSON numbers have the same value, regardless of how they are stored.
fn numbers_equal(left: &Number, right: &Number) -> bool {
    if let (Some(left), Some(right)) = (left.as_i64(), right.as_i64()) {
        return left == right;
    }
    if let (Some(left), Some(right)) = (left.as_u64(), right.as_u64()) {
        return left == right;
    }
    if left.is_f64() || right.is_f64() {
        return left.as_f64() == right.as_f64();
    }
    // A negative integer and an integer above `i64::MAX`.
    false
}

/// Return whether two optional values are structurally equal, where `None` is an absent value.
pub fn optional_values_equal(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => values_equal(left, right),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn snapshot_does_not_alias() {
        let original = doc(json!({ "a": { "b": 1 } }));
        let mut copy = snapshot(&original);
        copy["a"]["b"] = json!(2);

        assert_eq!(original["a"]["b"], json!(1));
        assert_eq!(copy["a"]["b"], json!(2));
    }

    #[test]
    fn key_order_is_not_significant() {
        let left = doc(json!({ "a": 1, "b": { "c": true, "d": null } }));
        let right = doc(json!({ "b": { "d": null, "c": true }, "a": 1 }));

        assert!(documents_equal(&left, &right));
    }

    #[test]
    fn differing_key_sets_are_not_equal() {
        let left = doc(json!({ "a": 1 }));
        let right = doc(json!({ "a": 1, "b": null }));

        assert!(!documents_equal(&left, &right));
        assert!(!documents_equal(&right, &left));
    }

    #[test]
    fn array_order_is_significant() {
        assert!(values_equal(&json!([1, 2]), &json!([1, 2])));
        assert!(!values_equal(&json!([1, 2]), &json!([2, 1])));
    }

    #[test]
    fn primitives_compare_by_value() {
        assert!(values_equal(&json!("x"), &json!("x")));
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(!values_equal(&json!(null), &json!(false)));
    }

    #[test]
    fn numbers_compare_by_value_not_representation() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!(-3.0), &json!(-3)));
        assert!(values_equal(&json!(u64::MAX), &json!(u64::MAX)));
        assert!(!values_equal(&json!(1), &json!(1.5)));
        assert!(!values_equal(&json!(-1), &json!(u64::MAX)));
        assert!(documents_equal(
            &doc(json!({ "n": { "m": [2] } })),
            &doc(json!({ "n": { "m": [2.0] } }))
        ));
    }

    #[test]
    fn absent_differs_from_null() {
        assert!(optional_values_equal(None, None));
        assert!(!optional_values_equal(None, Some(&Value::Null)));
    }
}
