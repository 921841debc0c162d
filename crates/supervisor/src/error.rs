// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("HOME is not set; cannot resolve the default pid file path")]
    NoHomeDir,
    #[error("child binary {0:?} not found")]
    ChildBinaryNotFound(std::path::PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
