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

use async_trait::async_trait;

/// The host's action for opening a file with the user's default application.
#[async_trait]
pub trait Shell: Send + Sync {
    /// Open the file at `path`.
    ///
    /// This resolves to an empty string if the file was opened, and to an error message otherwise.
    async fn open_path(&self, path: &Path) -> String;
}
