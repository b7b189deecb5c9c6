// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so by default events go to a log file next to the session data.
//! `--log-stderr` is meant for non-interactive runs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter, Layer,
};

/// Environment variable holding the tracing filter directives.
pub const LOG_ENV: &str = "NOTECITE_LOG";
pub const LOG_FILE_NAME: &str = "notecite.log";
const DEFAULT_DIRECTIVES: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to [`LOG_FILE_NAME`] inside this directory.
    File(PathBuf),
    Stderr,
}

impl LogTarget {
    pub fn log_file(&self) -> Option<PathBuf> {
        match self {
            Self::File(dir) => Some(dir.join(LOG_FILE_NAME)),
            Self::Stderr => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Filter from `NOTECITE_LOG`, falling back to `info` when unset or unparsable.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Installs the global subscriber.
///
/// For file targets the returned guard flushes buffered events on drop and must be held for the
/// lifetime of the process.
pub fn init(target: &LogTarget) -> Result<Option<WorkerGuard>, LoggingError> {
    match target {
        LogTarget::Stderr => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_filter(env_filter());
            tracing_subscriber::registry().with(layer).try_init()?;
            Ok(None)
        }
        LogTarget::File(dir) => {
            ensure_dir(dir)?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(env_filter());
            tracing_subscriber::registry().with(layer).try_init()?;
            info!(file = %dir.join(LOG_FILE_NAME).display(), "logging initialized");
            Ok(Some(guard))
        }
    }
}

fn ensure_dir(dir: &Path) -> Result<(), LoggingError> {
    fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir { path: dir.to_path_buf(), source })
}
