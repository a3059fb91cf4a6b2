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

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{
    error::handle_panic, error_middleware::error_page_middleware, handlers,
    request_logging::request_logging_middleware, AppState,
};

pub fn create_router(state: AppState) -> Router {
    let app = Router::new()
        .route("/", get(handlers::home))
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route(
            "/publish",
            get(handlers::publish_form).post(handlers::publish),
        )
        .route("/article/{id}", get(handlers::view_article))
        .route("/edit/{id}", get(handlers::edit_form).post(handlers::edit))
        .route("/source/{source}", get(handlers::list_by_source))
        .route("/delete_article/{id}", post(handlers::delete_article))
        .with_state(state.clone());

    with_middleware(app, state)
}

/// Error pages, panic recovery and request logging, outermost last
pub fn with_middleware(router: Router, state: AppState) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(state, error_page_middleware))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
