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
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};

use crate::{template_context::base_context, AppState};

/// Replace bare 404 and 500 responses with the rendered error page
pub async fn error_page_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    let status = response.status();
    if !matches!(
        status,
        StatusCode::NOT_FOUND | StatusCode::INTERNAL_SERVER_ERROR
    ) || is_html(&response)
    {
        return response;
    }

    match render_error_page(&state, status) {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Failed to render error template: {:?}", e);
            response
        }
    }
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("text/html"))
        .unwrap_or(false)
}

fn render_error_page(state: &AppState, status: StatusCode) -> anyhow::Result<Response> {
    let mut context = base_context(None, &[]);
    context.insert("error_code", &status.as_u16());

    let (title, message) = match status {
        StatusCode::NOT_FOUND => ("Page Not Found", "The page you're looking for doesn't exist."),
        _ => (
            "Server Error",
            "Something went wrong on our end. Please try again later.",
        ),
    };
    context.insert("error_title", title);
    context.insert("error_message", message);

    let html = state.templates.render("error.html", &context)?;

    Ok((status, Html(html)).into_response())
}
