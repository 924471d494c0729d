/*
 * Copyright 2019-2020 Garrett Powell
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

//! `config-store` is a library for persistent application settings.
//!
//! A [`Store`] keeps a single JSON object in a file, gives dot-path access to its nested fields,
//! and notifies observers when values change. It is designed for applications made of a privileged
//! main process and non-privileged renderer processes, where only the main process can ask the
//! host where the per-user data directory is.
//!
//! Every operation on a store is synchronous and durable. A mutation returns only after the whole
//! document has been atomically written to its file, and the file is written by renaming a
//! temporary file over it, so a reader never sees a half-written document. A missing or corrupt
//! file is not an error: the store falls back to its default values and rewrites the file.
//!
//! By default, a store re-reads its file before every operation, so it observes changes made by
//! other stores, other processes, or a person editing the file. See [`Consistency`] for the
//! faster alternative and its limitations.
//!
//! # Examples
//! ```
//! use config_store::{Host, OpenOptions, StaticPaths};
//! use serde_json::json;
//!
//! fn main() -> config_store::Result<()> {
//!     # let temp_dir = tempfile::tempdir().unwrap();
//!     # let data_dir = temp_dir.path();
//!     // Tell the store where the per-user data directory is.
//!     let host = Host::main(StaticPaths::new(data_dir, "1.0.0"));
//!
//!     // Open the store at `<data_dir>/config.json`.
//!     let mut store = OpenOptions::new().open(&host)?;
//!
//!     // Watch a key for changes.
//!     let subscription = store.on_did_change("window.width", |new, old| {
//!         println!("width changed from {:?} to {:?}", old, new);
//!         Ok(())
//!     });
//!
//!     // Nested objects are created as needed.
//!     store.set("window.width", 800)?;
//!     assert_eq!(store.get("window"), Some(json!({ "width": 800 })));
//!
//!     assert!(store.delete("window.width")?);
//!     assert!(!store.has("window.width"));
//!     assert!(store.has("window"));
//!
//!     subscription.cancel();
//!     Ok(())
//! }
//! ```
//!
//! # Paths
//! A path is a dot-separated sequence of keys. There is no escape syntax, so a key which contains a
//! dot cannot be addressed. See [`path`] for details.

pub use self::document::Document;
pub use self::error::{Error, Result};
pub use self::host::{
    Host, HostInfo, LocalTransport, PathService, ProcessRole, Responder, StaticPaths, Transport,
    BRIDGE_CHANNEL, USER_DATA,
};
pub use self::notify::Subscription;
pub use self::resolve::DEFAULT_NAME;
pub use self::shell::Shell;
pub use self::store::{Consistency, Iter, OpenOptions, Store, StoreConfig};

mod document;
mod error;
mod host;
mod notify;
pub mod path;
mod persist;
mod resolve;
mod shell;
pub mod storage;
mod store;
