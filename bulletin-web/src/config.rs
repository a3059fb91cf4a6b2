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
use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub templates_dir: String,
    /// Master secret for signing the session and flash cookies
    pub secret_key: String,
    /// True when no SECRET_KEY was configured and one was generated
    pub secret_key_generated: bool,
    pub development_mode: bool,
    pub session_lifetime_hours: i64,
    pub log_dir: String,
    pub log_file_max_bytes: usize,
    pub log_file_count: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_templates_dir = Self::find_project_root()?
            .join("templates")
            .to_string_lossy()
            .to_string();

        let (secret_key, secret_key_generated) =
            match lookup("SECRET_KEY").filter(|s| !s.trim().is_empty()) {
                Some(secret) => (secret, false),
                None => (
                    format!("{}{}", uuid::Uuid::new_v4(), uuid::Uuid::new_v4()),
                    true,
                ),
            };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "sqlite:bulletin.db".to_string()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .context("Invalid PORT")?,
            templates_dir: lookup("TEMPLATES_DIR").unwrap_or(default_templates_dir),
            secret_key,
            secret_key_generated,
            development_mode: lookup("DEVELOPMENT_MODE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            session_lifetime_hours: lookup("SESSION_LIFETIME_HOURS")
                .unwrap_or_else(|| "24".to_string())
                .parse()
                .context("Invalid SESSION_LIFETIME_HOURS")?,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_file_max_bytes: lookup("LOG_FILE_MAX_BYTES")
                .unwrap_or_else(|| "104857600".to_string()) // 100MB
                .parse()
                .context("Invalid LOG_FILE_MAX_BYTES")?,
            log_file_count: lookup("LOG_FILE_COUNT")
                .unwrap_or_else(|| "20".to_string())
                .parse()
                .context("Invalid LOG_FILE_COUNT")?,
        })
    }

    /// Find the project root by looking for the workspace Cargo.toml
    fn find_project_root() -> Result<PathBuf> {
        let mut current_dir = env::current_dir()?;

        loop {
            let cargo_toml = current_dir.join("Cargo.toml");
            if cargo_toml.exists() {
                let content = std::fs::read_to_string(&cargo_toml)?;
                if content.contains("[workspace]") {
                    return Ok(current_dir);
                }
            }

            if !current_dir.pop() {
                break;
            }
        }

        env::current_dir().context("Failed to determine project root")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
