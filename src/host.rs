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

//! Access to the host application's services.
//!
//! A store needs two things from the host application: the per-user data directory, which is the
//! default location of its document, and the application version. A process in the
//! [`ProcessRole::Main`] role asks the host's [`PathService`] directly. A process in the
//! [`ProcessRole::Renderer`] role has no access to that service and instead sends a synchronous
//! request over a [`Transport`] to the main process, which must have called
//! [`Host::init_renderer`] first.
//!
//! The role is fixed when a [`Host`] is created, and the corresponding access strategy is chosen
//! once when a store is opened.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use static_assertions::assert_obj_safe;
use tracing::debug;

/// The channel on which the main process answers renderer requests.
pub const BRIDGE_CHANNEL: &str = "config-store-get-data";

/// The name of the per-user data directory in a [`PathService`].
pub const USER_DATA: &str = "userData";

/// Information about the host application which a store needs to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostInfo {
    /// The directory which documents are stored in by default.
    pub default_base_dir: PathBuf,

    /// The version of the host application.
    pub app_version: String,
}

/// The role of the current process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessRole {
    /// The privileged process, which has direct access to the file system and host services.
    Main,

    /// A non-privileged process, which reaches host services only through the main process.
    Renderer,
}

/// The host application's identity and path-resolution service.
pub trait PathService: fmt::Debug + Send + Sync {
    /// Return whether the service can currently answer requests.
    fn is_ready(&self) -> bool;

    /// Return the directory with the given well-known `name`, such as [`USER_DATA`].
    fn get_path(&self, name: &str) -> anyhow::Result<PathBuf>;

    /// Return the version of the host application.
    fn app_version(&self) -> String;
}

assert_obj_safe!(PathService);

/// A function which answers synchronous requests on a channel.
pub type Responder = Box<dyn Fn() -> anyhow::Result<Value> + Send + Sync>;

/// A synchronous request/response channel between processes.
///
/// The main process registers responders and renderer processes send requests to them.
pub trait Transport: fmt::Debug + Send + Sync {
    /// Register `responder` to answer requests on `channel`, replacing any existing responder.
    fn register_sync_responder(&self, channel: &str, responder: Responder);

    /// Remove the responder on `channel`, if there is one.
    fn unregister_responder(&self, channel: &str);

    /// Return whether a responder is registered on `channel`.
    fn is_registered(&self, channel: &str) -> bool;

    /// Send a request on `channel` and block until it is answered.
    ///
    /// This returns `Err` if no responder is registered on `channel` or the responder failed.
    fn send_sync(&self, channel: &str) -> anyhow::Result<Value>;
}

assert_obj_safe!(Transport);

/// A way of obtaining [`HostInfo`] which depends on the role of the process.
pub(crate) trait HostAccess {
    fn host_info(&self) -> crate::Result<HostInfo>;
}

/// Asks the host's path service directly.
struct DirectAccess<'a> {
    paths: &'a dyn PathService,
}

impl<'a> HostAccess for DirectAccess<'a> {
    fn host_info(&self) -> crate::Result<HostInfo> {
        if !self.paths.is_ready() {
            return Err(crate::Error::Initialization(String::from(
                "the host path service is not ready",
            )));
        }

        let default_base_dir = self.paths.get_path(USER_DATA).map_err(|error| {
            crate::Error::Initialization(format!(
                "the host path service could not resolve `{}`: {:#}",
                USER_DATA, error
            ))
        })?;

        Ok(HostInfo {
            default_base_dir,
            app_version: self.paths.app_version(),
        })
    }
}

/// Asks the main process over the transport.
struct ProxiedAccess<'a> {
    transport: &'a dyn Transport,
}

impl<'a> HostAccess for ProxiedAccess<'a> {
    fn host_info(&self) -> crate::Result<HostInfo> {
        let response = self.transport.send_sync(BRIDGE_CHANNEL).map_err(|error| {
            crate::Error::Initialization(format!(
                "the main process did not answer on `{}` ({:#}); call `Store::init_renderer` in \
                 the main process before opening a store in a renderer process",
                BRIDGE_CHANNEL, error
            ))
        })?;

        serde_json::from_value(response).map_err(|error| {
            crate::Error::Initialization(format!(
                "the main process sent a malformed response on `{}`: {}",
                BRIDGE_CHANNEL, error
            ))
        })
    }
}

/// A handle to the host application's services.
///
/// Whether renderer requests are being answered is a property of the transport, so every main
/// `Host` sharing a transport sees the same bridge state.
#[derive(Debug, Clone)]
pub struct Host {
    role: ProcessRole,
    paths: Option<Arc<dyn PathService>>,
    transport: Option<Arc<dyn Transport>>,
}

impl Host {
    /// Create a `Host` for the main process which uses the given path service.
    pub fn main(paths: impl PathService + 'static) -> Self {
        Host {
            role: ProcessRole::Main,
            paths: Some(Arc::new(paths)),
            transport: None,
        }
    }

    /// Create a `Host` for a renderer process which reaches the main process over `transport`.
    pub fn renderer(transport: impl Transport + 'static) -> Self {
        Host {
            role: ProcessRole::Renderer,
            paths: None,
            transport: Some(Arc::new(transport)),
        }
    }

    /// Use `transport` to answer requests from renderer processes.
    ///
    /// This is only needed in the main process, and only if renderer processes open stores.
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Return the role of this process.
    pub fn role(&self) -> ProcessRole {
        self.role
    }

    /// Return whether this process is answering renderer requests.
    pub fn is_bridge_initialized(&self) -> bool {
        self.role == ProcessRole::Main
            && self
                .transport
                .as_ref()
                .map_or(false, |transport| transport.is_registered(BRIDGE_CHANNEL))
    }

    /// Return the strategy for obtaining host information in this process.
    pub(crate) fn access(&self) -> crate::Result<Box<dyn HostAccess + '_>> {
        match (self.role, &self.paths, &self.transport) {
            (ProcessRole::Main, Some(paths), _) => Ok(Box::new(DirectAccess {
                paths: paths.as_ref(),
            })),
            (ProcessRole::Renderer, _, Some(transport)) => Ok(Box::new(ProxiedAccess {
                transport: transport.as_ref(),
            })),
            _ => Err(crate::Error::Initialization(String::from(
                "the host has no way to reach the host path service",
            ))),
        }
    }

    /// Start answering requests from renderer processes.
    ///
    /// This registers a responder on [`BRIDGE_CHANNEL`] which answers with the [`HostInfo`] of
    /// this process. Calling this again while the responder is registered does nothing.
    ///
    /// # Errors
    /// - `Error::Initialization`: This is not the main process or it has no transport.
    pub fn init_renderer(&self) -> crate::Result<()> {
        if self.role != ProcessRole::Main {
            return Err(crate::Error::Initialization(String::from(
                "`init_renderer` must be called in the main process",
            )));
        }
        let (paths, transport) = match (&self.paths, &self.transport) {
            (Some(paths), Some(transport)) => (Arc::clone(paths), transport),
            _ => {
                return Err(crate::Error::Initialization(String::from(
                    "`init_renderer` requires a path service and a transport",
                )))
            }
        };

        if transport.is_registered(BRIDGE_CHANNEL) {
            return Ok(());
        }

        transport.register_sync_responder(
            BRIDGE_CHANNEL,
            Box::new(move || {
                let info = DirectAccess {
                    paths: paths.as_ref(),
                }
                .host_info()?;
                Ok(serde_json::to_value(info)?)
            }),
        );
        debug!(channel = BRIDGE_CHANNEL, "registered renderer responder");

        Ok(())
    }

    /// Stop answering requests from renderer processes.
    ///
    /// This removes the responder registered by any main `Host` sharing this transport. It does
    /// nothing if no responder is registered or this is not the main process.
    pub fn cleanup_main(&self) {
        let transport = match (&self.role, &self.transport) {
            (ProcessRole::Main, Some(transport)) => transport,
            _ => return,
        };
        if !transport.is_registered(BRIDGE_CHANNEL) {
            return;
        }
        transport.unregister_responder(BRIDGE_CHANNEL);
        debug!(channel = BRIDGE_CHANNEL, "unregistered renderer responder");
    }
}

/// A `PathService` with fixed answers.
///
/// This is useful for applications which are not embedded in a host framework, and for testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPaths {
    user_data: PathBuf,
    app_version: String,
    ready: bool,
}

impl StaticPaths {
    /// Create a `StaticPaths` which is ready and resolves [`USER_DATA`] to `user_data`.
    pub fn new(user_data: impl Into<PathBuf>, app_version: impl Into<String>) -> Self {
        StaticPaths {
            user_data: user_data.into(),
            app_version: app_version.into(),
            ready: true,
        }
    }

    /// Set whether this service reports itself as ready.
    pub fn ready(mut self, ready: bool) -> Self {
        self.ready = ready;
        self
    }
}

impl PathService for StaticPaths {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn get_path(&self, name: &str) -> anyhow::Result<PathBuf> {
        match name {
            USER_DATA => Ok(self.user_data.clone()),
            _ => Err(anyhow!("unknown path name `{}`", name)),
        }
    }

    fn app_version(&self) -> String {
        self.app_version.clone()
    }
}

/// A `Transport` between threads of the same process.
///
/// Clones of a `LocalTransport` share the same responders, so one clone can be given to the main
/// [`Host`] and another to a renderer [`Host`].
#[derive(Clone, Default)]
pub struct LocalTransport {
    responders: Arc<Mutex<HashMap<String, Arc<dyn Fn() -> anyhow::Result<Value> + Send + Sync>>>>,
}

impl LocalTransport {
    /// Create a new `LocalTransport` with no responders.
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for LocalTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let responders = self.responders.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("LocalTransport")
            .field("channels", &responders.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Transport for LocalTransport {
    fn register_sync_responder(&self, channel: &str, responder: Responder) {
        self.responders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel.to_owned(), Arc::from(responder));
    }

    fn unregister_responder(&self, channel: &str) {
        self.responders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(channel);
    }

    fn is_registered(&self, channel: &str) -> bool {
        self.responders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(channel)
    }

    fn send_sync(&self, channel: &str) -> anyhow::Result<Value> {
        // The lock is released before the responder runs so that it can use this transport.
        let responder = self
            .responders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel)
            .cloned()
            .ok_or_else(|| anyhow!("no responder is registered on `{}`", channel))?;
        responder()
    }
}
