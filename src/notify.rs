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

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use serde_json::Value;

use crate::document::{documents_equal, optional_values_equal, Document};
use crate::path;

/// A handler which is called with the new and old value of a watched key.
///
/// An absent value is passed as `None`.
pub type ChangeHandler =
    Box<dyn FnMut(Option<&Value>, Option<&Value>) -> anyhow::Result<()> + Send>;

/// A handler which is called with the new and old document.
pub type AnyChangeHandler = Box<dyn FnMut(&Document, &Document) -> anyhow::Result<()> + Send>;

type Shared<T> = Arc<Mutex<T>>;

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct Registries {
    next_id: u64,
    keyed: Vec<(u64, String, Shared<ChangeHandler>)>,
    wildcard: Vec<(u64, Shared<AnyChangeHandler>)>,
}

impl Registries {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn contains(&self, id: u64) -> bool {
        self.keyed.iter().any(|(keyed_id, _, _)| *keyed_id == id)
            || self.wildcard.iter().any(|(wildcard_id, _)| *wildcard_id == id)
    }

    fn remove(&mut self, id: u64) {
        self.keyed.retain(|(keyed_id, _, _)| *keyed_id != id);
        self.wildcard.retain(|(wildcard_id, _)| *wildcard_id != id);
    }
}

/// The change handlers registered on a store.
#[derive(Default)]
pub(crate) struct Notifier {
    registries: Arc<Mutex<Registries>>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registries = lock(&self.registries);
        f.debug_struct("Notifier")
            .field("keyed", &registries.keyed.len())
            .field("wildcard", &registries.wildcard.len())
            .finish()
    }
}

impl Notifier {
    /// Call `handler` whenever the value at `key` changes.
    pub fn subscribe(&self, key: &str, handler: ChangeHandler) -> Subscription {
        let mut registries = lock(&self.registries);
        let id = registries.next_id();
        registries
            .keyed
            .push((id, key.to_owned(), Arc::new(Mutex::new(handler))));
        self.subscription(id)
    }

    /// Call `handler` whenever any part of the document changes.
    pub fn subscribe_any(&self, handler: AnyChangeHandler) -> Subscription {
        let mut registries = lock(&self.registries);
        let id = registries.next_id();
        registries
            .wildcard
            .push((id, Arc::new(Mutex::new(handler))));
        self.subscription(id)
    }

    fn subscription(&self, id: u64) -> Subscription {
        Subscription {
            id,
            registries: Arc::downgrade(&self.registries),
        }
    }

    fn is_active(&self, id: u64) -> bool {
        lock(&self.registries).contains(id)
    }

    /// Notify handlers of the differences between `old` and `new`.
    ///
    /// Wildcard handlers are called first, then keyed handlers grouped by key in the order the keys
    /// were first subscribed to. Within a group, handlers are called in the order they were
    /// registered. A handler which is cancelled during dispatch is not called afterwards.
    ///
    /// Every handler is called even if an earlier one fails. This returns the errors of the
    /// handlers which failed.
    pub fn dispatch(&self, old: &Document, new: &Document) -> Vec<anyhow::Error> {
        // Handlers run without the registry lock held so they can subscribe and cancel.
        let (keyed, wildcard) = {
            let registries = lock(&self.registries);
            (registries.keyed.clone(), registries.wildcard.clone())
        };
        let mut errors = Vec::new();

        if !wildcard.is_empty() && !documents_equal(old, new) {
            for (id, handler) in &wildcard {
                if !self.is_active(*id) {
                    continue;
                }
                let mut handler = lock(handler);
                if let Err(error) = (*handler)(new, old) {
                    errors.push(error);
                }
            }
        }

        let mut keys: Vec<&str> = Vec::new();
        for (_, key, _) in &keyed {
            if !keys.contains(&key.as_str()) {
                keys.push(key);
            }
        }

        for key in keys {
            let old_value = path::get(old, key);
            let new_value = path::get(new, key);
            if optional_values_equal(old_value, new_value) {
                continue;
            }

            for (id, _, handler) in keyed.iter().filter(|(_, watched, _)| watched == key) {
                if !self.is_active(*id) {
                    continue;
                }
                let mut handler = lock(handler);
                if let Err(error) = (*handler)(new_value, old_value) {
                    errors.push(error);
                }
            }
        }

        errors
    }
}

/// A registration of a change handler on a [`Store`].
///
/// The handler stays registered until [`cancel`] is called. Dropping a `Subscription` does not
/// cancel it.
///
/// [`Store`]: crate::Store
/// [`cancel`]: crate::Subscription::cancel
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    registries: Weak<Mutex<Registries>>,
}

impl Subscription {
    /// Stop calling the handler.
    ///
    /// This takes effect for every subsequent notification, including the rest of a dispatch which
    /// is in progress. Cancelling more than once, or after the store was dropped, does nothing.
    pub fn cancel(&self) {
        if let Some(registries) = self.registries.upgrade() {
            lock(&registries).remove(self.id);
        }
    }

    /// Return whether the handler is still registered.
    pub fn is_active(&self) -> bool {
        self.registries
            .upgrade()
            .map_or(false, |registries| lock(&registries).contains(self.id))
    }
}
