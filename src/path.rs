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

//! Dot-path addressing of fields in a [`Document`].
//!
//! A path like `"a.b.c"` addresses the field `c` of the object `b` of the object `a`. A path with
//! no dots addresses a top-level field. Only JSON objects are traversed; arrays are leaf values.
//!
//! There is no escape syntax, so a key which itself contains a dot cannot be addressed as a single
//! segment. The path `"a.b"` always means the field `b` of `a`, never a top-level key named `a.b`.
//!
//! The functions in this module never modify the document they are given. [`set`] and [`delete`]
//! return a modified snapshot instead.
//!
//! [`Document`]: crate::Document

use serde_json::{Map, Value};

use crate::document::{snapshot, Document};

/// Split `path` into its parent segments and its last segment.
fn split_leaf(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, path),
    }
}

/// Replace `value` with an empty object unless it already is one, and return the object.
fn ensure_object(value: &mut Value) -> &mut Document {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

/// Return the value at `path` in `document`.
///
/// This returns `None` as soon as a segment is missing or a value along the way is not an object,
/// including `null`. A field which is present with a `null` value is returned as `Value::Null`.
pub fn get<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Return the value at `path` in `document`, or `default` if there is none.
pub fn get_or(document: &Document, path: &str, default: Value) -> Value {
    get(document, path).cloned().unwrap_or(default)
}

/// Return whether there is a field at `path` in `document`.
///
/// This checks for existence, not truthiness: a field whose value is `null` or `false` is present.
pub fn has(document: &Document, path: &str) -> bool {
    get(document, path).is_some()
}

/// Return a snapshot of `document` with `value` placed at `path`.
///
/// Missing intermediate fields are created as empty objects. An intermediate field which exists
/// but is not an object is overwritten with one.
pub fn set(document: &Document, path: &str, value: Value) -> Document {
    let mut result = snapshot(document);
    insert(&mut result, path, value);
    result
}

/// Return a snapshot of `document` with the field at `path` removed.
///
/// This also returns whether the field was present. Only the leaf field is removed; its parents are
/// left in place even if they become empty. If the field is not present, the returned document is
/// an unmodified snapshot.
pub fn delete(document: &Document, path: &str) -> (Document, bool) {
    let mut result = snapshot(document);
    let removed = remove(&mut result, path);
    (result, removed)
}

/// Place `value` at `path` in `document` in place.
pub(crate) fn insert(document: &mut Document, path: &str, value: Value) {
    let (parent, leaf) = split_leaf(path);
    let mut current = document;
    if let Some(parent) = parent {
        for segment in parent.split('.') {
            let child = current
                .entry(segment)
                .or_insert_with(|| Value::Object(Map::new()));
            current = ensure_object(child);
        }
    }
    current.insert(leaf.to_owned(), value);
}

/// Remove the field at `path` from `document` in place, returning whether it was present.
pub(crate) fn remove(document: &mut Document, path: &str) -> bool {
    let (parent, leaf) = split_leaf(path);
    let mut current = document;
    if let Some(parent) = parent {
        for segment in parent.split('.') {
            current = match current.get_mut(segment) {
                Some(Value::Object(map)) => map,
                _ => return false,
            };
        }
    }
    current.shift_remove(leaf).is_some()
}
