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

use std::path::{Path, PathBuf};

use crate::host::HostInfo;

/// The name of a store's document when none is given.
pub const DEFAULT_NAME: &str = "config";

/// The file extension of a store's document.
const EXTENSION: &str = "json";

/// Return the absolute path of the document named `name`.
///
/// The document lives in `cwd` if it is absolute, in `cwd` relative to the host's default directory
/// if it is relative, and in the host's default directory otherwise.
pub(crate) fn document_path(info: &HostInfo, name: &str, cwd: Option<&Path>) -> PathBuf {
    let base = match cwd {
        Some(cwd) if cwd.is_absolute() => cwd.to_path_buf(),
        Some(cwd) => info.default_base_dir.join(cwd),
        None => info.default_base_dir.clone(),
    };
    base.join(format!("{}.{}", name, EXTENSION))
}
