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
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use bulletin_db::repositories::ArticleRepository;
use tracing::{info, warn};

use crate::{
    auth::CurrentUser,
    error::AppError,
    flash::{self, FlashMessage},
    AppState,
};

use super::edit::deny_modification;
use super::shared::{load_article, parse_article_id};

/// Hard delete; category links go with the article
pub async fn delete_article(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let id = parse_article_id(&id)?;
    let article = load_article(&state, id).await?;

    if !article.can_be_modified_by(&current.user) {
        warn!(article_id = id, user = %current.user.username, "Delete refused");
        return Ok(deny_modification(jar, id, "You can only delete your own articles."));
    }

    if !ArticleRepository::new(state.db.clone()).delete(id).await? {
        return Err(AppError::not_found("Article not found"));
    }

    info!(article_id = id, user = %current.user.username, title = %article.title, "Article deleted");

    let jar = flash::push(jar, FlashMessage::success("Article deleted."));
    Ok((jar, Redirect::to("/")).into_response())
}
