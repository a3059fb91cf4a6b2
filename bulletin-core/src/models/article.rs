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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::category::Category;
use super::country::CountryList;
use super::user::User;

pub const MAX_TITLE_LENGTH: usize = 100;
pub const MAX_SOURCE_LENGTH: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArticleType {
    Hack,
    Leak,
    News,
    Opinion,
    Other,
}

impl ArticleType {
    pub const ALL: [ArticleType; 5] = [
        ArticleType::Hack,
        ArticleType::Leak,
        ArticleType::News,
        ArticleType::Opinion,
        ArticleType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleType::Hack => "Hack",
            ArticleType::Leak => "Leak",
            ArticleType::News => "News",
            ArticleType::Opinion => "Opinion",
            ArticleType::Other => "Other",
        }
    }
}

impl fmt::Display for ArticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown article type: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub id: Option<i64>,
    pub title: String,
    /// Markdown source; rendered on display only
    pub content: String,
    /// Username of the publisher, copied at publish time
    pub author: String,
    pub publish_date: DateTime<Utc>,
    /// Comma-joined country names, see [`CountryList`]
    pub country: String,
    pub download_link: String,
    pub article_type: ArticleType,
    pub source: String,
    pub categories: Vec<Category>,
}

impl Article {
    /// Create an article from a validated draft, authored by `author` now.
    pub fn from_draft(draft: &ArticleDraft, author: &str, categories: Vec<Category>) -> Self {
        Self {
            id: None,
            title: draft.title.trim().to_string(),
            content: draft.content.clone(),
            author: author.to_string(),
            publish_date: Utc::now(),
            country: draft.countries.encode(),
            download_link: draft.download_link.trim().to_string(),
            article_type: draft.article_type,
            source: draft.source.trim().to_string(),
            categories,
        }
    }

    /// Overwrite every editable field. Identity, author and publish date
    /// are kept.
    pub fn apply_draft(&mut self, draft: &ArticleDraft, categories: Vec<Category>) {
        self.title = draft.title.trim().to_string();
        self.content = draft.content.clone();
        self.country = draft.countries.encode();
        self.download_link = draft.download_link.trim().to_string();
        self.article_type = draft.article_type;
        self.source = draft.source.trim().to_string();
        self.categories = categories;
    }

    pub fn countries(&self) -> CountryList {
        CountryList::decode(&self.country)
    }

    pub fn category_ids(&self) -> Vec<i64> {
        self.categories.iter().filter_map(|c| c.id).collect()
    }

    /// Only the original author or an admin may edit or delete.
    pub fn can_be_modified_by(&self, user: &User) -> bool {
        user.is_admin || user.username == self.author
    }

    /// Draft pre-filled with the current values, for the edit form.
    pub fn to_draft(&self) -> ArticleDraft {
        ArticleDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            countries: self.countries(),
            article_type: self.article_type,
            download_link: self.download_link.clone(),
            source: self.source.clone(),
            category_ids: self.category_ids(),
        }
    }
}

/// Field name to error messages, in a stable order for rendering.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Every user-editable field of an article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub countries: CountryList,
    pub article_type: ArticleType,
    pub download_link: String,
    pub source: String,
    pub category_ids: Vec<i64>,
}

impl ArticleDraft {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut add = |field: &str, message: String| {
            errors.entry(field.to_string()).or_default().push(message);
        };

        let title = self.title.trim();
        if title.is_empty() {
            add("title", "Title is required".to_string());
        } else if title.chars().count() > MAX_TITLE_LENGTH {
            add(
                "title",
                format!("Title cannot exceed {} characters", MAX_TITLE_LENGTH),
            );
        }

        if self.content.trim().is_empty() {
            add("content", "Content is required".to_string());
        }

        if let Err(e) = self.countries.validate() {
            add("countries", e);
        }

        if let Err(e) = validate_download_link(&self.download_link) {
            add("download_link", e);
        }

        if self.source.trim().chars().count() > MAX_SOURCE_LENGTH {
            add(
                "source",
                format!("Source cannot exceed {} characters", MAX_SOURCE_LENGTH),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// An empty link is allowed; anything else must be an absolute http(s) URL.
pub fn validate_download_link(link: &str) -> Result<(), String> {
    let link = link.trim();
    if link.is_empty() {
        return Ok(());
    }

    match url::Url::parse(link) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(_) => Err("Download link must use http or https".to_string()),
        Err(_) => Err("Download link must be a valid URL".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draft() -> ArticleDraft {
        ArticleDraft {
            title: "  Breach at ACME  ".to_string(),
            content: "# Details\n\nLots of *data*.".to_string(),
            countries: CountryList::from_selection(["France", "Germany"]),
            article_type: ArticleType::Leak,
            download_link: "https://example.com/dump.zip".to_string(),
            source: " darkforum ".to_string(),
            category_ids: vec![1, 2],
        }
    }

    fn user(name: &str, admin: bool) -> User {
        let mut user = User::new(name.to_string(), "pw").unwrap();
        user.is_admin = admin;
        user
    }

    #[test]
    fn test_article_type_parse() {
        for t in ArticleType::ALL {
            assert_eq!(t.as_str().parse::<ArticleType>().unwrap(), t);
        }
        assert!("Rumor".parse::<ArticleType>().is_err());
        assert!("hack".parse::<ArticleType>().is_err());
        assert_eq!(ArticleType::Opinion.to_string(), "Opinion");
    }

    #[test]
    fn test_from_draft() {
        let categories = vec![Category {
            id: Some(1),
            name: "Ransomware".to_string(),
        }];
        let article = Article::from_draft(&draft(), "alice", categories.clone());

        assert!(article.id.is_none());
        assert_eq!(article.title, "Breach at ACME");
        assert_eq!(article.author, "alice");
        assert_eq!(article.country, "France, Germany");
        assert_eq!(article.source, "darkforum");
        assert_eq!(article.article_type, ArticleType::Leak);
        assert_eq!(article.categories, categories);
    }

    #[test]
    fn test_to_draft_round_trips_countries() {
        let article = Article::from_draft(&draft(), "alice", vec![]);
        let edited = article.to_draft();

        assert_eq!(
            edited.countries.names(),
            &["France".to_string(), "Germany".to_string()]
        );
    }

    #[test]
    fn test_apply_draft_keeps_identity() {
        let mut article = Article::from_draft(&draft(), "alice", vec![]);
        article.id = Some(7);
        let published = article.publish_date;

        let mut changed = draft();
        changed.title = "Updated".to_string();
        changed.countries = CountryList::from_selection(["Spain"]);
        changed.article_type = ArticleType::News;
        article.apply_draft(&changed, vec![]);

        assert_eq!(article.id, Some(7));
        assert_eq!(article.author, "alice");
        assert_eq!(article.publish_date, published);
        assert_eq!(article.title, "Updated");
        assert_eq!(article.country, "Spain");
        assert_eq!(article.article_type, ArticleType::News);
    }

    #[test]
    fn test_can_be_modified_by() {
        let article = Article::from_draft(&draft(), "alice", vec![]);

        assert!(article.can_be_modified_by(&user("alice", false)));
        assert!(article.can_be_modified_by(&user("admin", true)));
        assert!(!article.can_be_modified_by(&user("mallory", false)));
    }

    #[test]
    fn test_validate_ok() {
        assert!(draft().validate().is_ok());

        let mut minimal = draft();
        minimal.download_link = String::new();
        minimal.source = String::new();
        minimal.countries = CountryList::default();
        assert!(minimal.validate().is_ok());
    }

    #[test]
    fn test_validate_collects_field_errors() {
        let mut bad = draft();
        bad.title = "   ".to_string();
        bad.content = String::new();
        bad.download_link = "ftp://example.com/file".to_string();
        bad.countries = CountryList::from_selection(["Korea, Republic of"]);

        let errors = bad.validate().unwrap_err();
        let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["content", "countries", "download_link", "title"]);
    }

    #[test]
    fn test_validate_title_length() {
        let mut long = draft();
        long.title = "t".repeat(MAX_TITLE_LENGTH + 1);
        assert!(long.validate().unwrap_err().contains_key("title"));

        long.title = "t".repeat(MAX_TITLE_LENGTH);
        assert!(long.validate().is_ok());
    }

    #[test]
    fn test_validate_download_link() {
        assert!(validate_download_link("").is_ok());
        assert!(validate_download_link("http://example.com").is_ok());
        assert!(validate_download_link("not a url").is_err());
        assert!(validate_download_link("javascript:alert(1)").is_err());
    }
}
