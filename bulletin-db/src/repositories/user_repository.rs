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
use bulletin_core::models::user::User;
use sqlx::SqlitePool;

use crate::datetime::{format_datetime, parse_datetime};

type UserRow = (i64, String, String, bool, String);

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &User) -> Result<i64> {
        if let Err(e) = user.is_valid() {
            return Err(anyhow::anyhow!("Invalid user: {}", e));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, is_admin, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(format_datetime(&user.created_at))
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find user by id")?;

        row.map(user_from_row).transpose()
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find user by username")?;

        row.map(user_from_row).transpose()
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check username")?;

        Ok(count > 0)
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list users")?;

        rows.into_iter().map(user_from_row).collect()
    }

    /// Persist the password hash and admin flag. Usernames never change.
    pub async fn update(&self, user: &User) -> Result<()> {
        let id = user
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update user without id"))?;

        if let Err(e) = user.is_valid() {
            return Err(anyhow::anyhow!("Invalid user: {}", e));
        }

        let rows_affected = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = ?, is_admin = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update user")?
        .rows_affected();

        if rows_affected == 0 {
            return Err(anyhow::anyhow!("User not found"));
        }

        Ok(())
    }
}

/// True when the error chain contains a UNIQUE constraint violation.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
            .map(|db| db.is_unique_violation())
            .unwrap_or(false)
    })
}

fn user_from_row(row: UserRow) -> Result<User> {
    let (id, username, password_hash, is_admin, created_at) = row;

    Ok(User {
        id: Some(id),
        username,
        password_hash,
        is_admin,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}
