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

//! Low-level backends for reading and writing the document file.
//!
//! A storage backend only reads whole files and atomically replaces whole files. Everything else,
//! including serialization, recovery from corrupt files, and caching, is implemented at a higher
//! level. Backends are meant to be small so that the file system can be swapped out in tests.
//!
//! All backends implement the [`Storage`] trait. [`DiskStorage`] is the backend used by default.
//!
//! [`Storage`]: crate::storage::Storage
//! [`DiskStorage`]: crate::storage::DiskStorage

pub use self::backend::Storage;
pub use self::disk_storage::DiskStorage;
pub use self::memory_storage::MemoryStorage;

mod backend;
mod disk_storage;
mod memory_storage;
