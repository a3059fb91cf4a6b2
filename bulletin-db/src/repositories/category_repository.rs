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
use bulletin_core::models::category::Category;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, category: &Category) -> Result<i64> {
        if let Err(e) = category.is_valid() {
            return Err(anyhow::anyhow!("Invalid category: {}", e));
        }

        let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(&category.name)
            .execute(&self.pool)
            .await
            .context("Failed to create category")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM categories WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find category by name")?;

        Ok(row.map(|(id, name)| Category { id: Some(id), name }))
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories")?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Category { id: Some(id), name })
            .collect())
    }

    /// Categories among `ids` that exist. Unknown ids are dropped without
    /// error; duplicates collapse.
    pub async fn find_existing(&self, ids: &[i64]) -> Result<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, name FROM categories WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY name");

        let rows = builder
            .build_query_as::<(i64, String)>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to look up categories")?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Category { id: Some(id), name })
            .collect())
    }
}
