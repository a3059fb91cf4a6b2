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

use anyhow::{Context, Result};
use bulletin_core::models::{
    article::{Article, ArticleType},
    category::Category,
};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;

use crate::datetime::{format_datetime, parse_datetime};

type ArticleRow = (
    i64,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
);

const SELECT_ARTICLE: &str = r#"
    SELECT id, title, content, author, publish_date, country, download_link, article_type, source
    FROM articles
"#;

pub struct ArticleRepository {
    pool: SqlitePool,
}

impl ArticleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the article and its category links; returns the new id.
    pub async fn create(&self, article: &Article) -> Result<i64> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let id = sqlx::query(
            r#"
            INSERT INTO articles (title, content, author, publish_date, country, download_link, article_type, source)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(&article.author)
        .bind(format_datetime(&article.publish_date))
        .bind(&article.country)
        .bind(&article.download_link)
        .bind(article.article_type.as_str())
        .bind(&article.source)
        .execute(&mut *tx)
        .await
        .context("Failed to create article")?
        .last_insert_rowid();

        link_categories(&mut tx, id, &article.category_ids()).await?;

        tx.commit().await.context("Failed to commit article")?;

        tracing::info!(article_id = id, author = %article.author, "Article created");
        Ok(id)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Article>> {
        let row = sqlx::query_as::<_, ArticleRow>(&format!("{} WHERE id = ?", SELECT_ARTICLE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to find article by id")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut articles = vec![article_from_row(row)?];
        self.attach_categories(&mut articles).await?;
        Ok(articles.pop())
    }

    /// Every article, newest first.
    pub async fn list_recent(&self) -> Result<Vec<Article>> {
        let rows = sqlx::query_as::<_, ArticleRow>(&format!(
            "{} ORDER BY publish_date DESC, id DESC",
            SELECT_ARTICLE
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list articles")?;

        self.load(rows).await
    }

    /// Articles whose source matches exactly, newest first.
    pub async fn list_by_source(&self, source: &str) -> Result<Vec<Article>> {
        let rows = sqlx::query_as::<_, ArticleRow>(&format!(
            "{} WHERE source = ? ORDER BY publish_date DESC, id DESC",
            SELECT_ARTICLE
        ))
        .bind(source)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list articles by source")?;

        self.load(rows).await
    }

    /// Overwrite the editable fields and replace the category links.
    pub async fn update(&self, article: &Article) -> Result<()> {
        let id = article
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update article without id"))?;

        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let rows_affected = sqlx::query(
            r#"
            UPDATE articles
            SET title = ?, content = ?, country = ?, download_link = ?, article_type = ?, source = ?
            WHERE id = ?
            "#,
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(&article.country)
        .bind(&article.download_link)
        .bind(article.article_type.as_str())
        .bind(&article.source)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to update article")?
        .rows_affected();

        if rows_affected == 0 {
            return Err(anyhow::anyhow!("Article not found"));
        }

        sqlx::query("DELETE FROM article_categories WHERE article_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear article categories")?;

        link_categories(&mut tx, id, &article.category_ids()).await?;

        tx.commit().await.context("Failed to commit article update")?;

        tracing::info!(article_id = id, "Article updated");
        Ok(())
    }

    /// Hard delete. Returns false when no such article existed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM article_categories WHERE article_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete article categories")?;

        let rows_affected = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete article")?
            .rows_affected();

        tx.commit().await.context("Failed to commit article delete")?;

        if rows_affected > 0 {
            tracing::info!(article_id = id, "Article deleted");
        }
        Ok(rows_affected > 0)
    }

    async fn load(&self, rows: Vec<ArticleRow>) -> Result<Vec<Article>> {
        let mut articles = rows
            .into_iter()
            .map(article_from_row)
            .collect::<Result<Vec<_>>>()?;
        self.attach_categories(&mut articles).await?;
        Ok(articles)
    }

    async fn attach_categories(&self, articles: &mut [Article]) -> Result<()> {
        let ids: Vec<i64> = articles.iter().filter_map(|a| a.id).collect();
        if ids.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT ac.article_id, c.id, c.name
            FROM article_categories ac
            JOIN categories c ON c.id = ac.category_id
            WHERE ac.article_id IN (
            "#,
        );
        let mut separated = builder.separated(", ");
        for id in &ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY c.name");

        let rows = builder
            .build_query_as::<(i64, i64, String)>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to load article categories")?;

        let mut by_article: HashMap<i64, Vec<Category>> = HashMap::new();
        for (article_id, category_id, name) in rows {
            by_article.entry(article_id).or_default().push(Category {
                id: Some(category_id),
                name,
            });
        }

        for article in articles.iter_mut() {
            if let Some(id) = article.id {
                article.categories = by_article.remove(&id).unwrap_or_default();
            }
        }

        Ok(())
    }
}

async fn link_categories(
    conn: &mut SqliteConnection,
    article_id: i64,
    category_ids: &[i64],
) -> Result<()> {
    for category_id in category_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO article_categories (article_id, category_id) VALUES (?, ?)",
        )
        .bind(article_id)
        .bind(category_id)
        .execute(&mut *conn)
        .await
        .context("Failed to link article category")?;
    }
    Ok(())
}

fn article_from_row(row: ArticleRow) -> Result<Article> {
    let (id, title, content, author, publish_date, country, download_link, article_type, source) =
        row;

    let article_type = article_type
        .parse::<ArticleType>()
        .map_err(|e| anyhow::anyhow!("Corrupt article {}: {}", id, e))?;

    Ok(Article {
        id: Some(id),
        title,
        content,
        author,
        publish_date: parse_datetime(&publish_date, "publish_date")?,
        country,
        download_link,
        article_type,
        source,
        categories: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::connect_in_memory;
    use crate::repositories::CategoryRepository;
    use bulletin_core::models::{article::ArticleDraft, country::CountryList};
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    fn draft(title: &str, source: &str) -> ArticleDraft {
        ArticleDraft {
            title: title.to_string(),
            content: "Body with **markdown**".to_string(),
            countries: CountryList::from_selection(["France", "Germany"]),
            article_type: ArticleType::News,
            download_link: String::new(),
            source: source.to_string(),
            category_ids: Vec::new(),
        }
    }

    async fn setup() -> Result<(SqlitePool, Category, Category)> {
        let pool = connect_in_memory().await?;
        let categories = CategoryRepository::new(pool.clone());
        let a = categories.create(&Category::new("Alpha")).await?;
        let b = categories.create(&Category::new("Beta")).await?;
        Ok((
            pool,
            Category { id: Some(a), name: "Alpha".to_string() },
            Category { id: Some(b), name: "Beta".to_string() },
        ))
    }

    async fn count_links(pool: &SqlitePool, article_id: i64) -> Result<i64> {
        Ok(
            sqlx::query_scalar("SELECT COUNT(*) FROM article_categories WHERE article_id = ?")
                .bind(article_id)
                .fetch_one(pool)
                .await?,
        )
    }

    #[tokio::test]
    async fn test_create_and_find() -> Result<()> {
        let (pool, alpha, beta) = setup().await?;
        let repo = ArticleRepository::new(pool);

        let article = Article::from_draft(&draft("First", "wire"), "alice", vec![beta, alpha]);
        let id = repo.create(&article).await?;

        let found = repo.find_by_id(id).await?.expect("article exists");
        assert_eq!(found.title, "First");
        assert_eq!(found.author, "alice");
        assert_eq!(found.country, "France, Germany");
        assert_eq!(found.article_type, ArticleType::News);
        let names: Vec<&str> = found.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);

        assert!(repo.find_by_id(id + 100).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() -> Result<()> {
        let (pool, _, _) = setup().await?;
        let repo = ArticleRepository::new(pool);

        let mut older = Article::from_draft(&draft("Older", "wire"), "alice", vec![]);
        older.publish_date = Utc::now() - Duration::days(1);
        let newer = Article::from_draft(&draft("Newer", "wire"), "bob", vec![]);

        repo.create(&newer).await?;
        repo.create(&older).await?;

        let titles: Vec<String> = repo
            .list_recent()
            .await?
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["Newer".to_string(), "Older".to_string()]);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_by_source_exact_match() -> Result<()> {
        let (pool, _, _) = setup().await?;
        let repo = ArticleRepository::new(pool);

        repo.create(&Article::from_draft(&draft("A", "Reuters"), "alice", vec![]))
            .await?;
        repo.create(&Article::from_draft(&draft("B", "reuters"), "alice", vec![]))
            .await?;
        repo.create(&Article::from_draft(&draft("C", "Reuters UK"), "alice", vec![]))
            .await?;

        let found = repo.list_by_source("Reuters").await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "A");

        assert!(repo.list_by_source("AP").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_links() -> Result<()> {
        let (pool, alpha, beta) = setup().await?;
        let repo = ArticleRepository::new(pool.clone());

        let id = repo
            .create(&Article::from_draft(&draft("Orig", "wire"), "alice", vec![alpha]))
            .await?;
        let mut article = repo.find_by_id(id).await?.expect("article exists");
        let published = article.publish_date;

        let mut changed = draft("Changed", "blog");
        changed.countries = CountryList::from_selection(["Spain"]);
        changed.article_type = ArticleType::Opinion;
        article.apply_draft(&changed, vec![beta.clone()]);
        repo.update(&article).await?;

        let reloaded = repo.find_by_id(id).await?.expect("article exists");
        assert_eq!(reloaded.title, "Changed");
        assert_eq!(reloaded.source, "blog");
        assert_eq!(reloaded.country, "Spain");
        assert_eq!(reloaded.article_type, ArticleType::Opinion);
        assert_eq!(reloaded.author, "alice");
        assert_eq!(reloaded.publish_date, published);
        assert_eq!(reloaded.categories, vec![beta]);
        assert_eq!(count_links(&pool, id).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_article() -> Result<()> {
        let (pool, _, _) = setup().await?;
        let repo = ArticleRepository::new(pool);

        let mut ghost = Article::from_draft(&draft("Ghost", "wire"), "alice", vec![]);
        ghost.id = Some(404);
        assert!(repo.update(&ghost).await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_removes_links_and_listings() -> Result<()> {
        let (pool, alpha, beta) = setup().await?;
        let repo = ArticleRepository::new(pool.clone());

        let id = repo
            .create(&Article::from_draft(&draft("Doomed", "wire"), "alice", vec![alpha, beta]))
            .await?;
        assert_eq!(count_links(&pool, id).await?, 2);

        assert!(repo.delete(id).await?);

        assert_eq!(count_links(&pool, id).await?, 0);
        assert!(repo.find_by_id(id).await?.is_none());
        assert!(repo.list_recent().await?.is_empty());
        assert!(repo.list_by_source("wire").await?.is_empty());

        assert!(!repo.delete(id).await?);

        Ok(())
    }
}
