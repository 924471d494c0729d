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

use std::future::Future;
use std::mem;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::document::{documents_equal, snapshot, Document};
use crate::host::Host;
use crate::notify::{Notifier, Subscription};
use crate::path;
use crate::persist::{self, Loaded};
use crate::shell::Shell;
use crate::storage::Storage;

use super::config::{Consistency, StoreConfig};
use super::iter::Iter;
use super::open_options::OpenOptions;

/// Return `defaults` overlaid with the top-level fields of `on_disk`.
fn merge_defaults(defaults: &Document, on_disk: Document) -> Document {
    let mut merged = snapshot(defaults);
    for (key, value) in on_disk {
        merged.insert(key, value);
    }
    merged
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A persistent JSON document with dot-path access to its fields.
///
/// A `Store` owns one JSON file, which always contains a single JSON object. Fields are addressed
/// with dot-separated paths, so `"window.width"` is the field `width` of the object `window`. See
/// [`crate::path`] for the details of path syntax.
///
/// Every operation is synchronous. A mutation returns once the new document has been written to
/// the file, and the in-memory copy of the document is only updated after the write succeeds. When
/// the file is missing or corrupt, the store falls back to its default values and rewrites the file
/// instead of returning an error.
///
/// Change handlers registered with [`on_did_change`] and [`on_did_any_change`] are called
/// synchronously, after the write, whenever a value actually changes. See [`Consistency`] for how
/// changes made outside of this store are observed.
///
/// [`on_did_change`]: crate::Store::on_did_change
/// [`on_did_any_change`]: crate::Store::on_did_any_change
/// [`Consistency`]: crate::Consistency
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    defaults: Document,
    cache: Document,
    consistency: Consistency,
    storage: Box<dyn Storage>,
    notifier: Notifier,
    app_version: String,
}

impl Store {
    /// Open the store at `path`, merging in the default values from `config`.
    pub(super) fn initialize(
        path: PathBuf,
        config: StoreConfig,
        mut storage: Box<dyn Storage>,
        app_version: String,
    ) -> crate::Result<Self> {
        let StoreConfig {
            defaults,
            consistency,
            ..
        } = config;

        let (on_disk, exists) = match persist::load(storage.as_mut(), &path) {
            Loaded::Document(document) => (document, true),
            Loaded::Missing | Loaded::Corrupt => (Document::new(), false),
        };
        let missing_defaults = defaults.keys().any(|key| !on_disk.contains_key(key));
        let document = merge_defaults(&defaults, on_disk);

        if !exists || missing_defaults {
            persist::save(storage.as_mut(), &path, &document)?;
        }

        debug!(path = %path.display(), ?consistency, "opened store");

        Ok(Store {
            path,
            defaults,
            cache: document,
            consistency,
            storage,
            notifier: Notifier::default(),
            app_version,
        })
    }

    /// Open the store named `config` in the host's per-user data directory.
    ///
    /// See [`OpenOptions`] for other ways to open a store.
    ///
    /// [`OpenOptions`]: crate::OpenOptions
    pub fn open(host: &Host) -> crate::Result<Self> {
        OpenOptions::new().open(host)
    }

    /// Let renderer processes open stores.
    ///
    /// This must be called in the main process before any renderer process opens a store. See
    /// [`Host::init_renderer`].
    ///
    /// [`Host::init_renderer`]: crate::Host::init_renderer
    pub fn init_renderer(host: &Host) -> crate::Result<()> {
        host.init_renderer()
    }

    /// Stop answering requests from renderer processes.
    ///
    /// See [`Host::cleanup_main`].
    ///
    /// [`Host::cleanup_main`]: crate::Host::cleanup_main
    pub fn cleanup_main(host: &Host) {
        host.cleanup_main()
    }

    /// Return the absolute path of the file this store persists its document to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the version of the host application.
    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    /// Return the policy this store uses to keep its document coherent with the file.
    pub fn consistency(&self) -> Consistency {
        self.consistency
    }

    /// Return the default values this store was opened with.
    pub fn defaults(&self) -> &Document {
        &self.defaults
    }

    /// Read the file, falling back to the default values if it is missing or corrupt.
    fn read_disk(&mut self) -> Document {
        match persist::load(self.storage.as_mut(), &self.path) {
            Loaded::Document(document) => document,
            Loaded::Missing | Loaded::Corrupt => {
                let fallback = snapshot(&self.defaults);
                if let Err(error) = persist::save(self.storage.as_mut(), &self.path, &fallback) {
                    warn!(path = %self.path.display(), %error, "could not rewrite document");
                }
                fallback
            }
        }
    }

    /// Bring the cached document up to date and return it.
    ///
    /// With `Consistency::DiskAuthoritative`, this re-reads the file and notifies change handlers
    /// of any difference from the cached document. Handler errors are logged because no mutation
    /// is in progress to return them from.
    fn refresh(&mut self) -> &Document {
        if self.consistency == Consistency::DiskAuthoritative {
            let on_disk = self.read_disk();
            let previous = mem::replace(&mut self.cache, on_disk);
            if !documents_equal(&previous, &self.cache) {
                debug!(path = %self.path.display(), "document changed outside of this store");
                for error in self.notifier.dispatch(&previous, &self.cache) {
                    warn!(path = %self.path.display(), ?error, "change handler failed");
                }
            }
        }
        &self.cache
    }

    /// Apply `change` to the current document, write the result, and notify change handlers.
    fn mutate<R>(&mut self, change: impl FnOnce(&Document) -> (Document, R)) -> crate::Result<R> {
        let old = snapshot(self.refresh());
        let (new, output) = change(&old);

        persist::save(self.storage.as_mut(), &self.path, &new)?;
        self.cache = new;

        let errors = self.notifier.dispatch(&old, &self.cache);
        if errors.is_empty() {
            Ok(output)
        } else {
            Err(crate::Error::Handlers(errors))
        }
    }

    /// Return the value at `key`.
    ///
    /// This returns `None` if there is no value at `key`.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        path::get(self.refresh(), key).cloned()
    }

    /// Return the value at `key`, or `default` if there is none.
    pub fn get_or(&mut self, key: &str, default: Value) -> Value {
        path::get_or(self.refresh(), key, default)
    }

    /// Return the value at `key` deserialized as a `V`.
    ///
    /// # Errors
    /// - `Error::Deserialize`: The value could not be deserialized as a `V`.
    pub fn get_as<V: DeserializeOwned>(&mut self, key: &str) -> crate::Result<Option<V>> {
        match self.get(key) {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|_| crate::Error::Deserialize),
            None => Ok(None),
        }
    }

    /// Return whether there is a value at `key`, even if it is `null`.
    pub fn has(&mut self, key: &str) -> bool {
        path::has(self.refresh(), key)
    }

    /// Set the value at `key`, creating intermediate objects as needed.
    ///
    /// # Errors
    /// - `Error::Serialize`: The `value` could not be serialized.
    /// - `Error::Persistence`: The document could not be written. The store is unchanged.
    /// - `Error::Handlers`: The value was set, but a change handler failed.
    pub fn set<V: Serialize>(&mut self, key: &str, value: V) -> crate::Result<()> {
        let value = serde_json::to_value(value).map_err(|_| crate::Error::Serialize)?;
        self.mutate(|old| (path::set(old, key, value), ()))
    }

    /// Set several values at once.
    ///
    /// `values` must serialize to a JSON object. Each of its top-level keys is a path and each
    /// value is set at that path as with [`set`]. The document is written and handlers are
    /// notified once.
    ///
    /// # Errors
    /// - `Error::InvalidArgument`: `values` is not an object.
    /// - `Error::Serialize`: `values` could not be serialized.
    /// - `Error::Persistence`: The document could not be written. The store is unchanged.
    /// - `Error::Handlers`: The values were set, but a change handler failed.
    ///
    /// [`set`]: crate::Store::set
    pub fn set_all<V: Serialize>(&mut self, values: V) -> crate::Result<()> {
        let fields = match serde_json::to_value(values).map_err(|_| crate::Error::Serialize)? {
            Value::Object(fields) => fields,
            other => {
                return Err(crate::Error::InvalidArgument(format!(
                    "expected an object of paths and values, found {}",
                    type_name(&other)
                )))
            }
        };

        self.mutate(|old| {
            let mut new = snapshot(old);
            for (key, value) in fields {
                path::insert(&mut new, &key, value);
            }
            (new, ())
        })
    }

    /// Remove the value at `key`.
    ///
    /// This returns `true` if the value was removed or `false` if it didn't exist. Parent objects
    /// are left in place.
    ///
    /// # Errors
    /// - `Error::Persistence`: The document could not be written. The store is unchanged.
    /// - `Error::Handlers`: The value was removed, but a change handler failed.
    pub fn delete(&mut self, key: &str) -> crate::Result<bool> {
        self.mutate(|old| path::delete(old, key))
    }

    /// Remove every value, leaving an empty document.
    ///
    /// Default values are not restored. Use [`reset`] for that.
    ///
    /// # Errors
    /// - `Error::Persistence`: The document could not be written. The store is unchanged.
    /// - `Error::Handlers`: The store was cleared, but a change handler failed.
    ///
    /// [`reset`]: crate::Store::reset
    pub fn clear(&mut self) -> crate::Result<()> {
        self.mutate(|_| (Document::new(), ()))
    }

    /// Restore the given `keys` to their default values.
    ///
    /// A key without a default value is removed.
    ///
    /// # Errors
    /// - `Error::Persistence`: The document could not be written. The store is unchanged.
    /// - `Error::Handlers`: The keys were reset, but a change handler failed.
    pub fn reset(&mut self, keys: &[&str]) -> crate::Result<()> {
        let restored: Vec<(&str, Option<Value>)> = keys
            .iter()
            .map(|key| (*key, path::get(&self.defaults, key).cloned()))
            .collect();

        self.mutate(|old| {
            let mut new = snapshot(old);
            for (key, default) in restored {
                match default {
                    Some(value) => path::insert(&mut new, key, value),
                    None => {
                        path::remove(&mut new, key);
                    }
                }
            }
            (new, ())
        })
    }

    /// Return a snapshot of the whole document.
    pub fn document(&mut self) -> Document {
        snapshot(self.refresh())
    }

    /// Replace the whole document.
    ///
    /// # Errors
    /// - `Error::Persistence`: The document could not be written. The store is unchanged.
    /// - `Error::Handlers`: The document was replaced, but a change handler failed.
    pub fn set_document(&mut self, document: Document) -> crate::Result<()> {
        self.mutate(|_| (document, ()))
    }

    /// Return the number of top-level fields in the document.
    pub fn len(&mut self) -> usize {
        self.refresh().len()
    }

    /// Return whether the document has no fields.
    pub fn is_empty(&mut self) -> bool {
        self.refresh().is_empty()
    }

    /// Return an iterator over the top-level fields of the document.
    ///
    /// The iterator owns a snapshot of the document, so each call starts over from the current
    /// contents of the store.
    pub fn iter(&mut self) -> Iter {
        Iter(self.document().into_iter())
    }

    /// Call `handler` with the new and old value whenever the value at `key` changes.
    ///
    /// The handler is called synchronously by the operation which changed the value. An absent
    /// value is passed as `None`. The handler is not called when a value is set to an equal value.
    pub fn on_did_change<F>(&self, key: &str, handler: F) -> Subscription
    where
        F: FnMut(Option<&Value>, Option<&Value>) -> anyhow::Result<()> + Send + 'static,
    {
        self.notifier.subscribe(key, Box::new(handler))
    }

    /// Call `handler` with the new and old document whenever any part of the document changes.
    pub fn on_did_any_change<F>(&self, handler: F) -> Subscription
    where
        F: FnMut(&Document, &Document) -> anyhow::Result<()> + Send + 'static,
    {
        self.notifier.subscribe_any(Box::new(handler))
    }

    /// Open the document in the user's editor using `shell`.
    ///
    /// # Errors
    /// - `Error::Shell`: The shell reported an error.
    pub fn open_in_editor<'a, S>(
        &self,
        shell: &'a S,
    ) -> impl Future<Output = crate::Result<()>> + 'a
    where
        S: Shell + ?Sized + 'a,
    {
        let path = self.path.clone();
        async move {
            let report = shell.open_path(&path).await;
            if report.is_empty() {
                Ok(())
            } else {
                Err(crate::Error::Shell(report))
            }
        }
    }
}

impl<'a> IntoIterator for &'a mut Store {
    type Item = (String, Value);
    type IntoIter = Iter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
