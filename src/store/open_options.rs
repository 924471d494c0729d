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

use std::path::PathBuf;

use crate::document::Document;
use crate::host::Host;
use crate::resolve::document_path;
use crate::storage::{DiskStorage, Storage};

use super::config::{Consistency, StoreConfig};
use super::engine::Store;

/// Open a store.
///
/// This type is a builder used to open stores. Typically, when using `OpenOptions`, you'll first
/// call [`new`], then chain method calls to configure how the store will be opened, and then
/// finally call [`open`].
///
/// Opening a store needs a [`Host`], which tells it where the per-user data directory is.
///
/// # Examples
/// ```
/// use config_store::{Host, OpenOptions, StaticPaths};
/// use serde_json::json;
///
/// # let temp_dir = tempfile::tempdir().unwrap();
/// # let data_dir = temp_dir.path();
/// let host = Host::main(StaticPaths::new(data_dir, "1.0.0"));
/// let mut store = OpenOptions::new()
///     .name("settings")
///     .defaults(json!({ "theme": "dark" }).as_object().unwrap().clone())
///     .open(&host)
///     .unwrap();
///
/// assert_eq!(store.get("theme"), Some(json!("dark")));
/// ```
///
/// [`new`]: crate::OpenOptions::new
/// [`open`]: crate::OpenOptions::open
/// [`Host`]: crate::Host
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    config: StoreConfig,
}

impl OpenOptions {
    /// Create a new `OpenOptions` with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given `config` instead of the default `StoreConfig`.
    pub fn config(&mut self, config: StoreConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Overwrite the name specified in [`StoreConfig::name`].
    ///
    /// [`StoreConfig::name`]: crate::StoreConfig::name
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.config.name = name.into();
        self
    }

    /// Overwrite the directory specified in [`StoreConfig::cwd`].
    ///
    /// [`StoreConfig::cwd`]: crate::StoreConfig::cwd
    pub fn cwd(&mut self, cwd: impl Into<PathBuf>) -> &mut Self {
        self.config.cwd = Some(cwd.into());
        self
    }

    /// Overwrite the default values specified in [`StoreConfig::defaults`].
    ///
    /// [`StoreConfig::defaults`]: crate::StoreConfig::defaults
    pub fn defaults(&mut self, defaults: Document) -> &mut Self {
        self.config.defaults = defaults;
        self
    }

    /// Overwrite the policy specified in [`StoreConfig::consistency`].
    ///
    /// [`StoreConfig::consistency`]: crate::StoreConfig::consistency
    pub fn consistency(&mut self, consistency: Consistency) -> &mut Self {
        self.config.consistency = consistency;
        self
    }

    /// Whether the store watches its file for changes made outside of it.
    ///
    /// Watching means `Consistency::DiskAuthoritative` and not watching means
    /// `Consistency::CacheAuthoritative`. Stores watch their file by default.
    pub fn watch(&mut self, watch: bool) -> &mut Self {
        self.config.consistency = if watch {
            Consistency::DiskAuthoritative
        } else {
            Consistency::CacheAuthoritative
        };
        self
    }

    /// Open the store, storing its document in the local file system.
    ///
    /// This resolves the path of the document, reads it, adds any missing default values, and
    /// writes it back if it did not exist or was missing default values.
    ///
    /// # Errors
    /// - `Error::Initialization`: The host's directories could not be determined. In a renderer
    /// process, this means the main process has not called [`Store::init_renderer`].
    /// - `Error::Persistence`: The document could not be written.
    ///
    /// [`Store::init_renderer`]: crate::Store::init_renderer
    pub fn open(&self, host: &Host) -> crate::Result<Store> {
        self.open_with_storage(host, DiskStorage::new())
    }

    /// Open the store, storing its document in the given `storage`.
    ///
    /// See [`open`] for details.
    ///
    /// [`open`]: crate::OpenOptions::open
    pub fn open_with_storage(
        &self,
        host: &Host,
        storage: impl Storage + 'static,
    ) -> crate::Result<Store> {
        let info = host.access()?.host_info()?;
        let path = document_path(&info, &self.config.name, self.config.cwd.as_deref());
        Store::initialize(
            path,
            self.config.clone(),
            Box::new(storage),
            info.app_version,
        )
    }
}
