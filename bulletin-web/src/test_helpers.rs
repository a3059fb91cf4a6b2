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

use anyhow::Result;
use axum::http::StatusCode;
use axum_test::TestServer;
use bulletin_core::{Category, User};
use bulletin_db::{
    connect_in_memory,
    repositories::{CategoryRepository, UserRepository},
};
use tempfile::TempDir;

use crate::{config::Config, routes::create_router, templates::init_templates, AppState};

pub fn test_config(dir: &str) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 5000,
        templates_dir: format!("{}/templates", dir),
        secret_key: "test-secret-key-for-signing-cookies".to_string(),
        secret_key_generated: false,
        development_mode: false,
        session_lifetime_hours: 24,
        log_dir: format!("{}/logs", dir),
        log_file_max_bytes: 1024 * 1024,
        log_file_count: 2,
    }
}

/// App state over an in-memory database, with the default templates
/// written to a temporary directory. Keep the `TempDir` alive.
pub async fn create_test_app_state() -> Result<(AppState, TempDir)> {
    let dir = tempfile::tempdir()?;
    let config = test_config(dir.path().to_str().unwrap_or("."));
    let templates = init_templates(&config.templates_dir, false)?;
    let pool = connect_in_memory().await?;

    Ok((AppState::new(pool, templates, config), dir))
}

pub async fn create_test_server() -> Result<(TestServer, AppState, TempDir)> {
    let (state, dir) = create_test_app_state().await?;
    let server = TestServer::new(create_router(state.clone()))?;
    Ok((server, state, dir))
}

pub async fn create_test_user(
    state: &AppState,
    username: &str,
    password: &str,
    is_admin: bool,
) -> Result<User> {
    let mut user = User::new(username.to_string(), password)?;
    user.is_admin = is_admin;

    let id = UserRepository::new(state.db.clone()).create(&user).await?;
    user.id = Some(id);
    Ok(user)
}

pub async fn create_test_category(state: &AppState, name: &str) -> Result<i64> {
    CategoryRepository::new(state.db.clone())
        .create(&Category::new(name))
        .await
}

/// Log in through the form and return the signed session cookie.
pub async fn login_cookie(
    server: &TestServer,
    username: &str,
    password: &str,
) -> cookie::Cookie<'static> {
    let response = server
        .post("/login")
        .form(&[("username", username), ("password", password)])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    response.cookie(crate::session::SESSION_COOKIE)
}
