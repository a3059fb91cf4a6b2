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
use bulletin_db::{init_database, repositories::SessionRepository};
use bulletin_web::{
    config::Config, logging::init_logging, routes, state::AppState, templates::init_templates,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let _log_guard = init_logging(&config)?;
    info!("Starting Bulletin web server");

    if config.secret_key_generated {
        warn!("SECRET_KEY is not set; using a random key. Sessions will not survive a restart.");
    }

    info!("Initializing database: {}", config.database_url);
    let db = init_database(&config.database_url).await?;

    let purged = SessionRepository::new(db.clone()).delete_expired().await?;
    if purged > 0 {
        info!("Removed {} expired sessions", purged);
    }

    info!("Loading templates from: {}", config.templates_dir);
    let templates = init_templates(&config.templates_dir, config.development_mode)?;

    let state = AppState::new(db, templates, config.clone());
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
