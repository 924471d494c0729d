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

//! A persistent JSON document with dot-path access and change notifications.
//!
//! This module contains the [`Store`] type along with the types used to configure and open it.
//!
//! [`Store`]: crate::Store

pub use self::config::{Consistency, StoreConfig};
pub use self::engine::Store;
pub use self::iter::Iter;
pub use self::open_options::OpenOptions;

mod config;
mod engine;
mod iter;
mod open_options;
