/*
 * Copyright 2019 Garrett Powell
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

use std::io;
use std::path::PathBuf;
use std::result;

use thiserror::Error as DeriveError;

/// The error type for operations with a store.
#[derive(Debug, DeriveError)]
pub enum Error {
    /// The store could not be initialized.
    ///
    /// This happens when the host's path service is unavailable or when a renderer process opens a
    /// store before the main process called [`Store::init_renderer`].
    ///
    /// [`Store::init_renderer`]: crate::Store::init_renderer
    #[error("The store could not be initialized: {0}")]
    Initialization(String),

    /// The document could not be written to the file system.
    ///
    /// When this is returned by a mutating operation, the in-memory copy of the document has not
    /// been changed.
    #[error("The document could not be written to `{}`: {source}", .path.display())]
    Persistence {
        /// The path of the document which could not be written.
        path: PathBuf,

        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An argument did not have the expected shape.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The shell failed to open the document.
    #[error("The document could not be opened: {0}")]
    Shell(String),

    /// A value could not be serialized.
    #[error("A value could not be serialized.")]
    Serialize,

    /// A value could not be deserialized.
    #[error("A value could not be deserialized.")]
    Deserialize,

    /// One or more change handlers returned an error.
    ///
    /// Every handler was still invoked, and the mutation which triggered them was committed before
    /// they ran.
    #[error("{} change handler(s) failed", .0.len())]
    Handlers(Vec<anyhow::Error>),
}

/// The result type for operations with a store.
pub type Result<T> = result::Result<T, Error>;
