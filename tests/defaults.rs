/*
 * Copyright 2019-2020 Wren Powell
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

use std::fs;

use serde_json::{json, Value};

use common::*;
use config_store::OpenOptions;

mod common;

#[rstest]
fn defaults_fill_missing_fields(memory_env: MemoryEnv) -> anyhow::Result<()> {
    memory_env.write_external(json!({ "theme": "light" }));

    let mut store = memory_env.open_with(
        OpenOptions::new().defaults(doc(json!({ "theme": "dark", "font": "mono" }))),
    )?;

    assert_that!(store.get("theme")).is_equal_to(Some(json!("light")));
    assert_that!(store.get("font")).is_equal_to(Some(json!("mono")));
    assert_that!(memory_env.read_raw())
        .is_equal_to(Some(json!({ "theme": "light", "font": "mono" })));
    Ok(())
}

#[rstest]
fn defaults_are_merged_per_top_level_field(memory_env: MemoryEnv) -> anyhow::Result<()> {
    memory_env.write_external(json!({ "window": { "width": 1024 } }));

    let mut store = memory_env.open_with(
        OpenOptions::new().defaults(doc(json!({ "window": { "width": 800, "height": 600 } }))),
    )?;

    assert_that!(store.get("window")).is_equal_to(Some(json!({ "width": 1024 })));
    assert_that!(store.has("window.height")).is_false();
    Ok(())
}

#[rstest]
fn has_sees_default_values(memory_env: MemoryEnv) -> anyhow::Result<()> {
    let mut store =
        memory_env.open_with(OpenOptions::new().defaults(doc(json!({ "a": { "b": 1 } }))))?;

    assert_that!(store.has("a.b")).is_true();
    assert_that!(store.has("a.c")).is_false();
    Ok(())
}

#[rstest]
fn complete_file_is_not_rewritten(memory_env: MemoryEnv) -> anyhow::Result<()> {
    let original = r#"{"theme":"light"}"#;
    memory_env.storage.put(memory_env.path(), original);

    memory_env.open_with(OpenOptions::new().defaults(doc(json!({ "theme": "dark" }))))?;

    assert_that!(memory_env.storage.contents(&memory_env.path()))
        .is_equal_to(Some(original.as_bytes().to_vec()));
    Ok(())
}

#[rstest]
fn missing_file_is_created_with_defaults(env: TestEnv) -> anyhow::Result<()> {
    let store = OpenOptions::new()
        .cwd(env.dir())
        .defaults(doc(json!({ "created": true })))
        .open(&env.host)?;

    assert_that!(env.read_raw(store.path())?).is_equal_to(json!({ "created": true }));
    Ok(())
}

#[rstest]
#[case(b"{ this is not json".to_vec())]
#[case(b"[1, 2, 3]".to_vec())]
#[case(b"\"a string\"".to_vec())]
#[case(Vec::new())]
fn corrupt_file_is_replaced_by_defaults(
    env: TestEnv,
    #[case] contents: Vec<u8>,
) -> anyhow::Result<()> {
    fs::write(env.default_path(), contents)?;

    let mut store = OpenOptions::new()
        .cwd(env.dir())
        .defaults(doc(json!({ "recovered": true })))
        .open(&env.host)?;

    assert_that!(Value::Object(store.document())).is_equal_to(json!({ "recovered": true }));
    assert_that!(env.read_raw(store.path())?).is_equal_to(json!({ "recovered": true }));
    Ok(())
}

#[rstest]
fn file_corrupted_while_open_falls_back_to_defaults(memory_env: MemoryEnv) -> anyhow::Result<()> {
    let mut store =
        memory_env.open_with(OpenOptions::new().defaults(doc(json!({ "safe": 1 }))))?;
    store.set("user", "value")?;

    memory_env.storage.put(memory_env.path(), "not json");

    assert_that!(store.get("user")).is_none();
    assert_that!(store.get("safe")).is_equal_to(Some(json!(1)));
    assert_that!(memory_env.read_raw()).is_equal_to(Some(json!({ "safe": 1 })));
    Ok(())
}

#[rstest]
fn file_deleted_while_open_falls_back_to_defaults(memory_env: MemoryEnv) -> anyhow::Result<()> {
    let mut store =
        memory_env.open_with(OpenOptions::new().defaults(doc(json!({ "safe": 1 }))))?;
    store.set("user", "value")?;

    memory_env.storage.remove(&memory_env.path());

    assert_that!(Value::Object(store.document())).is_equal_to(json!({ "safe": 1 }));
    assert_that!(memory_env.read_raw()).is_equal_to(Some(json!({ "safe": 1 })));
    Ok(())
}

#[rstest]
fn instances_with_different_defaults_converge(memory_env: MemoryEnv) -> anyhow::Result<()> {
    let mut first = memory_env
        .open_with(OpenOptions::new().defaults(doc(json!({ "a": 1, "shared": "first" }))))?;
    let mut second = memory_env
        .open_with(OpenOptions::new().defaults(doc(json!({ "b": 2, "shared": "second" }))))?;

    let expected = json!({ "a": 1, "shared": "first", "b": 2 });
    assert_that!(Value::Object(first.document())).is_equal_to(&expected);
    assert_that!(Value::Object(second.document())).is_equal_to(&expected);
    assert_that!(memory_env.read_raw()).is_equal_to(Some(expected));
    Ok(())
}
