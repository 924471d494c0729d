/*
 * Copyright 2019-2020 Wren Powell
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
use std::sync::Mutex;

use async_trait::async_trait;

use common::*;
use config_store::{Error, Shell};

mod common;

/// A `Shell` which records the paths it is asked to open.
#[derive(Debug, Default)]
struct RecordingShell {
    opened: Mutex<Vec<PathBuf>>,
    report: String,
}

#[async_trait]
impl Shell for RecordingShell {
    async fn open_path(&self, path: &Path) -> String {
        self.opened.lock().unwrap().push(path.to_path_buf());
        self.report.clone()
    }
}

#[tokio::test]
async fn open_in_editor_opens_the_document() -> anyhow::Result<()> {
    let test_env = TestEnv::new()?;
    let store = test_env.open()?;
    let shell = RecordingShell::default();

    store.open_in_editor(&shell).await?;

    assert_that!(*shell.opened.lock().unwrap()).is_equal_to(vec![test_env.default_path()]);
    Ok(())
}

#[tokio::test]
async fn shell_error_is_reported() -> anyhow::Result<()> {
    let test_env = TestEnv::new()?;
    let store = test_env.open()?;
    let shell = RecordingShell {
        report: String::from("no application is associated with this file"),
        ..RecordingShell::default()
    };

    let result = store.open_in_editor(&shell).await;

    assert_that!(result).is_err_variant(Error::Shell(String::new()));
    match result {
        Err(Error::Shell(message)) => {
            assert_that!(message.as_str())
                .is_equal_to("no application is associated with this file")
        }
        other => panic!("unexpected result: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn editor_future_outlives_the_store_borrow() -> anyhow::Result<()> {
    let test_env = TestEnv::new()?;
    let shell = RecordingShell::default();
    let future = {
        let store = test_env.open()?;
        store.open_in_editor(&shell)
    };

    future.await?;

    assert_that!(shell.opened.lock().unwrap().len()).is_equal_to(1);
    Ok(())
}
