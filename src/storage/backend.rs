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
use std::io;
use std::path::Path;

use static_assertions::assert_obj_safe;

/// A backend which reads and atomically replaces files.
///
/// A `Storage` is used by a [`Store`] to persist its document. It is keyed by absolute file paths.
///
/// [`Store`]: crate::Store
pub trait Storage: fmt::Debug + Send {
    /// Return the contents of the file at `path`.
    ///
    /// If there is no file at `path`, this returns `Ok(None)`.
    fn read(&mut self, path: &Path) -> io::Result<Option<Vec<u8>>>;

    /// Replace the contents of the file at `path` with `data`.
    ///
    /// Missing parent directories are created. If this method returns `Ok`, a subsequent `read`
    /// returns `data`. If this method returns `Err`, the previous contents of the file are left
    /// intact and it is up to the implementation to clean up anything it may have written.
    ///
    /// A concurrent reader must never observe partially written contents. This is an atomic
    /// operation.
    fn write(&mut self, path: &Path, data: &[u8]) -> io::Result<()>;
}

assert_obj_safe!(Storage);

impl Storage for Box<dyn Storage> {
    fn read(&mut self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        self.as_mut().read(path)
    }

    fn write(&mut self, path: &Path, data: &[u8]) -> io::Result<()> {
        self.as_mut().write(path, data)
    }
}
