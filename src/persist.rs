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

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::document::Document;
use crate::storage::Storage;

/// The result of reading the document file.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Loaded {
    /// The file contained a valid document.
    Document(Document),

    /// There is no file.
    Missing,

    /// The file could not be read, is not valid JSON, or does not contain a JSON object.
    Corrupt,
}

/// Read the document at `path` from `storage`.
///
/// This never fails. A file which cannot be read or parsed is reported as `Loaded::Corrupt` so the
/// caller can fall back to a default document.
pub(crate) fn load(storage: &mut dyn Storage, path: &Path) -> Loaded {
    let data = match storage.read(path) {
        Ok(Some(data)) => data,
        Ok(None) => return Loaded::Missing,
        Err(error) => {
            warn!(path = %path.display(), %error, "could not read document, recovering");
            return Loaded::Corrupt;
        }
    };

    match serde_json::from_slice::<Value>(&data) {
        Ok(Value::Object(document)) => Loaded::Document(document),
        Ok(_) => {
            warn!(path = %path.display(), "document is not a JSON object, recovering");
            Loaded::Corrupt
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "document is not valid JSON, recovering");
            Loaded::Corrupt
        }
    }
}

/// Write `document` to `path` in `storage`.
///
/// # Errors
/// - `Error::Serialize`: The document could not be serialized.
/// - `Error::Persistence`: The document could not be written.
pub(crate) fn save(
    storage: &mut dyn Storage,
    path: &Path,
    document: &Document,
) -> crate::Result<()> {
    let mut data = serde_json::to_vec_pretty(document).map_err(|_| crate::Error::Serialize)?;
    data.push(b'\n');

    storage
        .write(path, &data)
        .map_err(|source| crate::Error::Persistence {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), fields = document.len(), "wrote document");
    Ok(())
}
