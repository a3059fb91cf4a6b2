// Bulletin - A small multi-user publishing platform built with Rust
// Copyright (C) 2025 Bulletin Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::{Context, Result};
use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

pub const LOG_FILE_NAME: &str = "bulletin.log";

/// Size-capped log file: `LOG_FILE_COUNT` rotated files of at most
/// `LOG_FILE_MAX_BYTES` each.
pub fn rotating_log_file(config: &Config) -> Result<FileRotate<AppendCount>> {
    std::fs::create_dir_all(&config.log_dir).context("Failed to create log directory")?;

    Ok(FileRotate::new(
        Path::new(&config.log_dir).join(LOG_FILE_NAME),
        AppendCount::new(config.log_file_count),
        ContentLimit::Bytes(config.log_file_max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    ))
}

/// Install console and rotating-file logging. Keep the guard alive for
/// the lifetime of the process or buffered lines are lost.
pub fn init_logging(config: &Config) -> Result<WorkerGuard> {
    let (file_writer, guard) = tracing_appender::non_blocking(rotating_log_file(config)?);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bulletin_web=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_config;
    use std::io::Write;

    #[test]
    fn test_rotating_log_file_rotates_by_size() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut config = test_config(dir.path().to_str().unwrap_or("."));
        config.log_dir = dir.path().join("logs").to_string_lossy().to_string();
        config.log_file_max_bytes = 16;
        config.log_file_count = 2;

        let mut log = rotating_log_file(&config)?;
        for _ in 0..10 {
            log.write_all(b"0123456789\n")?;
        }
        log.flush()?;

        let log_dir = Path::new(&config.log_dir);
        assert!(log_dir.join(LOG_FILE_NAME).exists());
        assert!(log_dir.join(format!("{}.1", LOG_FILE_NAME)).exists());
        assert!(!log_dir.join(format!("{}.3", LOG_FILE_NAME)).exists());

        Ok(())
    }
}
