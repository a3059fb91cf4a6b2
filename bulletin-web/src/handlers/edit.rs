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
use axum_extra::extract::{Form, SignedCookieJar};
use bulletin_core::FieldErrors;
use bulletin_db::repositories::{ArticleRepository, CategoryRepository};
use tracing::{info, warn};

use crate::{
    auth::CurrentUser,
    error::AppError,
    flash::{self, FlashMessage},
    forms::{ArticleForm, ArticleFormView},
    AppState,
};

use super::shared::{load_article, parse_article_id, render_article_form, ArticleFormPage};

/// Send someone who may not touch the article back to it.
pub fn deny_modification(jar: SignedCookieJar, id: i64, message: &str) -> Response {
    let jar = flash::push(jar, FlashMessage::error(message));
    (jar, Redirect::to(&format!("/article/{}", id))).into_response()
}

pub async fn edit_form(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let id = parse_article_id(&id)?;
    let article = load_article(&state, id).await?;

    if !article.can_be_modified_by(&current.user) {
        warn!(article_id = id, user = %current.user.username, "Edit refused");
        return Ok(deny_modification(jar, id, "You can only edit your own articles."));
    }

    let (jar, messages) = flash::take(jar);
    let html = render_article_form(
        &state,
        &current.user,
        &messages,
        &ArticleFormPage::edit(id),
        &ArticleFormView::from(&article.to_draft()),
        &FieldErrors::new(),
    )
    .await?;
    Ok((jar, html).into_response())
}

pub async fn edit(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    jar: SignedCookieJar,
    Form(form): Form<ArticleForm>,
) -> Result<Response, AppError> {
    let id = parse_article_id(&id)?;
    let mut article = load_article(&state, id).await?;

    if !article.can_be_modified_by(&current.user) {
        warn!(article_id = id, user = %current.user.username, "Edit refused");
        return Ok(deny_modification(jar, id, "You can only edit your own articles."));
    }

    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(errors) => {
            let (jar, mut messages) = flash::take(jar);
            messages.push(FlashMessage::error("Please correct the errors below."));
            let html = render_article_form(
                &state,
                &current.user,
                &messages,
                &ArticleFormPage::edit(id),
                &ArticleFormView::from(&form),
                &errors,
            )
            .await?;
            return Ok((jar, html).into_response());
        }
    };

    let categories = CategoryRepository::new(state.db.clone())
        .find_existing(&draft.category_ids)
        .await?;
    article.apply_draft(&draft, categories);
    ArticleRepository::new(state.db.clone())
        .update(&article)
        .await?;

    info!(article_id = id, editor = %current.user.username, "Article updated");

    let jar = flash::push(jar, FlashMessage::success("Article updated."));
    Ok((jar, Redirect::to(&format!("/article/{}", id))).into_response())
}
