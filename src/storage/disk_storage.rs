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

use std::ffi::OsString;
use std::fs::{self, create_dir_all, remove_file, rename, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;
use uuid::Uuid;

use super::backend::Storage;

/// Return a new temporary path in the same directory as `path`.
///
/// The returned path has the form `<path>.tmp<timestamp><random>`.
fn temp_path(path: &Path) -> PathBuf {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let random = Uuid::new_v4().simple().to_string();
    let mut file_name = OsString::from(path.as_os_str());
    file_name.push(format!(".tmp{}{}", timestamp, &random[..8]));
    PathBuf::from(file_name)
}

/// Write `data` to `temp_path` and then move it to `path`.
fn write_and_rename(temp_path: &Path, path: &Path, data: &[u8]) -> io::Result<()> {
    let mut temp_file = File::create(temp_path)?;
    temp_file.write_all(data)?;
    temp_file.sync_all()?;
    drop(temp_file);
    rename(temp_path, path)
}

/// A `Storage` which stores files in the local file system.
///
/// Writes go to a uniquely named sibling of the target file which is then renamed over it, so
/// readers in this or any other process see either the old or the new contents.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiskStorage;

impl DiskStorage {
    /// Create a new `DiskStorage`.
    pub fn new() -> Self {
        DiskStorage
    }
}

impl Storage for DiskStorage {
    fn read(&mut self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(data) => Ok(Some(data)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn write(&mut self, path: &Path, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let temp_path = temp_path(path);
        let result = write_and_rename(&temp_path, path, data);

        if result.is_err() {
            // The original error is more useful to the caller than a failed cleanup.
            if let Err(cleanup_error) = remove_file(&temp_path) {
                if cleanup_error.kind() != io::ErrorKind::NotFound {
                    warn!(
                        path = %temp_path.display(),
                        error = %cleanup_error,
                        "could not remove temporary file"
                    );
                }
            }
        }

        result
    }
}
