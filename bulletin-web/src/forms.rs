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

use bulletin_core::{ArticleDraft, ArticleType, CountryList, FieldErrors, COUNTRIES};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Publish/edit form as submitted. `countries` and `categories` repeat.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ArticleForm {
    pub title: String,
    pub content: String,
    pub countries: Vec<String>,
    pub article_type: String,
    pub download_link: String,
    pub source: String,
    pub categories: Vec<String>,
}

impl ArticleForm {
    /// Selected category ids; values that are not numbers are ignored.
    pub fn category_ids(&self) -> Vec<i64> {
        self.categories
            .iter()
            .filter_map(|c| c.trim().parse().ok())
            .collect()
    }

    pub fn to_draft(&self) -> Result<ArticleDraft, FieldErrors> {
        let article_type = if self.article_type.trim().is_empty() {
            Err("Please choose an article type".to_string())
        } else {
            self.article_type.parse::<ArticleType>()
        };

        let draft = ArticleDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            countries: CountryList::from_selection(&self.countries),
            article_type: article_type.clone().unwrap_or(ArticleType::Other),
            download_link: self.download_link.clone(),
            source: self.source.clone(),
            category_ids: self.category_ids(),
        };

        let mut errors = draft.validate().err().unwrap_or_default();
        if let Err(e) = article_type {
            errors.entry("article_type".to_string()).or_default().push(e);
        }

        if errors.is_empty() {
            Ok(draft)
        } else {
            Err(errors)
        }
    }
}

/// Values echoed back into the publish/edit form.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ArticleFormView {
    pub title: String,
    pub content: String,
    pub countries: Vec<String>,
    pub article_type: String,
    pub download_link: String,
    pub source: String,
    pub category_ids: Vec<i64>,
}

impl From<&ArticleForm> for ArticleFormView {
    fn from(form: &ArticleForm) -> Self {
        Self {
            title: form.title.clone(),
            content: form.content.clone(),
            countries: CountryList::from_selection(&form.countries).names().to_vec(),
            article_type: form.article_type.trim().to_string(),
            download_link: form.download_link.clone(),
            source: form.source.clone(),
            category_ids: form.category_ids(),
        }
    }
}

impl From<&ArticleDraft> for ArticleFormView {
    fn from(draft: &ArticleDraft) -> Self {
        Self {
            title: draft.title.clone(),
            content: draft.content.clone(),
            countries: draft.countries.names().to_vec(),
            article_type: draft.article_type.to_string(),
            download_link: draft.download_link.clone(),
            source: draft.source.clone(),
            category_ids: draft.category_ids.clone(),
        }
    }
}

/// Country choices for the form. Stored names missing from the built-in
/// list are kept so editing never silently drops them.
pub fn country_options(selected: &[String]) -> Vec<String> {
    let mut options: Vec<String> = COUNTRIES.iter().map(|c| c.to_string()).collect();
    for name in selected {
        if !options.contains(name) {
            options.push(name.clone());
        }
    }
    options
}
