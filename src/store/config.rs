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

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::resolve::DEFAULT_NAME;

/// How a store keeps its in-memory copy of the document coherent with the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Consistency {
    /// The file is the source of truth.
    ///
    /// Every read and every mutation re-reads the file first, so changes made by other stores,
    /// other processes, or a person editing the file are always observed. Change handlers are
    /// notified of such external changes the next time the store reads the file.
    DiskAuthoritative,

    /// The in-memory copy is the source of truth once the store is open.
    ///
    /// The file is read once when the store is opened and written on every mutation, but never
    /// read again. This is faster, but it is only correct if this store is the only writer of its
    /// file for its entire lifetime. External changes are silently overwritten by the next
    /// mutation.
    CacheAuthoritative,
}

impl Default for Consistency {
    fn default() -> Self {
        Consistency::DiskAuthoritative
    }
}

/// The configuration for opening a [`Store`].
///
/// [`Store`]: crate::Store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// The name of the document, without the `.json` extension.
    ///
    /// The default value is `"config"`.
    pub name: String,

    /// The directory the document is stored in.
    ///
    /// An absolute path is used as is. A relative path is relative to the host's per-user data
    /// directory. If this is `None`, the document is stored in the per-user data directory.
    pub cwd: Option<PathBuf>,

    /// Values for top-level fields which are missing from the document when the store is opened.
    ///
    /// The default value is an empty document.
    pub defaults: Document,

    /// How the in-memory copy of the document is kept coherent with the file.
    ///
    /// The default value is `Consistency::DiskAuthoritative`.
    pub consistency: Consistency,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: String::from(DEFAULT_NAME),
            cwd: None,
            defaults: Document::new(),
            consistency: Consistency::default(),
        }
    }
}
