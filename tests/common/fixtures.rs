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
use std::path::{Path, PathBuf};

use rstest::*;
use serde_json::Value;
use tempfile::{tempdir, TempDir};

use config_store::storage::MemoryStorage;
use config_store::{Host, OpenOptions, StaticPaths, Store};

/// The application version reported by test hosts.
pub const APP_VERSION: &str = "2.4.1";

/// A temporary per-user data directory and a main-process host which points to it.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub host: Host,
}

impl TestEnv {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = tempdir()?;
        let host = Host::main(StaticPaths::new(temp_dir.path(), APP_VERSION));
        Ok(TestEnv { temp_dir, host })
    }

    /// The per-user data directory.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The path of the default document.
    pub fn default_path(&self) -> PathBuf {
        self.dir().join("config.json")
    }

    /// Open the default store in the data directory.
    pub fn open(&self) -> config_store::Result<Store> {
        OpenOptions::new().cwd(self.dir()).open(&self.host)
    }

    /// Read and parse the file at `path` without going through a store.
    pub fn read_raw(&self, path: &Path) -> anyhow::Result<Value> {
        Ok(serde_json::from_slice(&fs::read(path)?)?)
    }
}

/// An in-memory file system and a main-process host whose data directory lives in it.
pub struct MemoryEnv {
    pub storage: MemoryStorage,
    pub host: Host,
}

impl MemoryEnv {
    pub fn new() -> Self {
        MemoryEnv {
            storage: MemoryStorage::new(),
            host: Host::main(StaticPaths::new("/memory", APP_VERSION)),
        }
    }

    /// The path of the default document.
    pub fn path(&self) -> PathBuf {
        PathBuf::from("/memory/config.json")
    }

    /// Open the default store with the given `options`.
    pub fn open_with(&self, options: &OpenOptions) -> config_store::Result<Store> {
        options.open_with_storage(&self.host, self.storage.clone())
    }

    /// Open the default store.
    pub fn open(&self) -> config_store::Result<Store> {
        self.open_with(&OpenOptions::new())
    }

    /// Replace the document as if it were edited outside of any store.
    pub fn write_external(&self, value: Value) {
        self.storage.put(self.path(), value.to_string());
    }

    /// Parse the document without going through a store.
    pub fn read_raw(&self) -> Option<Value> {
        self.storage
            .contents(&self.path())
            .and_then(|data| serde_json::from_slice(&data).ok())
    }
}

#[fixture]
pub fn env() -> TestEnv {
    TestEnv::new().unwrap()
}

#[fixture]
pub fn memory_env() -> MemoryEnv {
    MemoryEnv::new()
}
