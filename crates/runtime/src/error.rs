// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime-crate error type. Converts the lower crates' narrow errors into
//! one flat enum the binary entry point and the HTTP surface can match on.

use orgloop_core::OrgLoopError;
use orgloop_storage::WalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no home directory found to resolve the data root")]
    NoDataRoot,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Wal(#[from] WalError),

    #[error(transparent)]
    Core(#[from] OrgLoopError),

    #[error("already bound to an HTTP listener")]
    AlreadyListening,

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}
