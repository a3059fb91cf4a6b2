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
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::SignedCookieJar;
use bulletin_core::Article;
use bulletin_db::repositories::ArticleRepository;

use crate::{
    auth::OptionalUser,
    error::AppError,
    flash,
    template_context::{base_context, render_page},
    AppState,
};

use super::shared::{load_article, parse_article_id};

fn render_listing(
    state: &AppState,
    current: &OptionalUser,
    jar: SignedCookieJar,
    heading: Option<String>,
    articles: &[Article],
) -> Result<Response, AppError> {
    let (jar, messages) = flash::take(jar);

    let mut context = base_context(current.user(), &messages);
    if let Some(heading) = heading {
        context.insert("heading", &heading);
    }
    context.insert("articles", articles);

    let html = render_page(state, "home.html", &context)?;
    Ok((jar, html).into_response())
}

/// All articles, newest first
pub async fn home(
    State(state): State<AppState>,
    current: OptionalUser,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let articles = ArticleRepository::new(state.db.clone()).list_recent().await?;
    render_listing(&state, &current, jar, None, &articles)
}

/// Articles whose source matches exactly
pub async fn list_by_source(
    State(state): State<AppState>,
    current: OptionalUser,
    Path(source): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let articles = ArticleRepository::new(state.db.clone())
        .list_by_source(&source)
        .await?;
    let heading = format!("Articles from {}", source);
    render_listing(&state, &current, jar, Some(heading), &articles)
}

pub async fn view_article(
    State(state): State<AppState>,
    current: OptionalUser,
    Path(id): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let article = load_article(&state, parse_article_id(&id)?).await?;
    let can_modify = current
        .user()
        .map(|user| article.can_be_modified_by(user))
        .unwrap_or(false);

    let (jar, messages) = flash::take(jar);
    let mut context = base_context(current.user(), &messages);
    context.insert("countries", article.countries().names());
    context.insert("can_modify", &can_modify);
    context.insert("article", &article);

    let html = render_page(&state, "article.html", &context)?;
    Ok((jar, html).into_response())
}
