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

#![allow(dead_code)]

pub use rstest::*;
pub use spectral::prelude::*;

pub use self::assertions::ErrorVariantAssertions;
pub use self::fixtures::{env, memory_env, MemoryEnv, TestEnv, APP_VERSION};

mod assertions;
mod fixtures;

/// Convert a JSON object literal into a `Document`.
pub fn doc(value: serde_json::Value) -> config_store::Document {
    match value {
        serde_json::Value::Object(document) => document,
        other => panic!("expected a JSON object, found {}", other),
    }
}
