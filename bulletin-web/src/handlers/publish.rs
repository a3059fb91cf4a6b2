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
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, SignedCookieJar};
use bulletin_core::{Article, FieldErrors};
use bulletin_db::repositories::{ArticleRepository, CategoryRepository};
use tracing::info;

use crate::{
    auth::CurrentUser,
    error::AppError,
    flash::{self, FlashMessage},
    forms::{ArticleForm, ArticleFormView},
    AppState,
};

use super::shared::{render_article_form, ArticleFormPage};

pub async fn publish_form(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let (jar, messages) = flash::take(jar);
    let html = render_article_form(
        &state,
        &current.user,
        &messages,
        &ArticleFormPage::publish(),
        &ArticleFormView::default(),
        &FieldErrors::new(),
    )
    .await?;
    Ok((jar, html).into_response())
}

pub async fn publish(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: SignedCookieJar,
    Form(form): Form<ArticleForm>,
) -> Result<Response, AppError> {
    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(errors) => {
            let (jar, mut messages) = flash::take(jar);
            messages.push(FlashMessage::error("Please correct the errors below."));
            let html = render_article_form(
                &state,
                &current.user,
                &messages,
                &ArticleFormPage::publish(),
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
    let article = Article::from_draft(&draft, &current.user.username, categories);
    let id = ArticleRepository::new(state.db.clone())
        .create(&article)
        .await?;

    info!(article_id = id, author = %current.user.username, "Article published");

    let jar = flash::push(jar, FlashMessage::success("Article published."));
    Ok((jar, Redirect::to("/")).into_response())
}
