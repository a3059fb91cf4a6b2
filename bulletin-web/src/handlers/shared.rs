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

use axum::response::Html;
use bulletin_core::{Article, ArticleType, FieldErrors, User};
use bulletin_db::repositories::{ArticleRepository, CategoryRepository};

use crate::{
    error::AppError,
    flash::FlashMessage,
    forms::{country_options, ArticleFormView},
    template_context::{base_context, render_page},
    AppState,
};

/// Article ids come from the path as text; anything that is not a number
/// cannot name an article.
pub fn parse_article_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::not_found("Article not found").with_details(format!("id {:?}", raw)))
}

pub async fn load_article(state: &AppState, id: i64) -> Result<Article, AppError> {
    ArticleRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Article not found").with_details(format!("id {}", id)))
}

/// Labels that differ between the publish and edit pages
pub struct ArticleFormPage {
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
}

impl ArticleFormPage {
    pub fn publish() -> Self {
        Self {
            heading: "Publish an article",
            action: "/publish".to_string(),
            submit_label: "Publish",
        }
    }

    pub fn edit(id: i64) -> Self {
        Self {
            heading: "Edit article",
            action: format!("/edit/{}", id),
            submit_label: "Save changes",
        }
    }
}

pub async fn render_article_form(
    state: &AppState,
    user: &User,
    messages: &[FlashMessage],
    page: &ArticleFormPage,
    form: &ArticleFormView,
    errors: &FieldErrors,
) -> Result<Html<String>, AppError> {
    let categories = CategoryRepository::new(state.db.clone()).list().await?;
    let article_types: Vec<&str> = ArticleType::ALL.iter().map(|t| t.as_str()).collect();

    let mut context = base_context(Some(user), messages);
    context.insert("heading", page.heading);
    context.insert("form_action", &page.action);
    context.insert("submit_label", page.submit_label);
    context.insert("form", form);
    context.insert("errors", errors);
    context.insert("categories", &categories);
    context.insert("article_types", &article_types);
    context.insert("country_options", &country_options(&form.countries));

    render_page(state, "publish.html", &context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_parse_article_id() {
        assert_eq!(parse_article_id("42").ok(), Some(42));
        assert_eq!(
            parse_article_id("forty-two").map_err(|e| e.status).err(),
            Some(StatusCode::NOT_FOUND)
        );
    }
}
