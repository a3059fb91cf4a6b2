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
use bulletin_core::models::session::Session;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::datetime::{format_datetime, parse_datetime};

type SessionRow = (String, i64, String, String);

pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, session: &Session) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(session.user_id)
        .bind(format_datetime(&session.expires_at))
        .bind(format_datetime(&session.created_at))
        .execute(&self.pool)
        .await
        .context("Failed to create session")?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, expires_at, created_at
            FROM sessions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find session by id")?;

        row.map(session_from_row).transpose()
    }

    pub async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Session>> {
        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, expires_at, created_at
            FROM sessions
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to find sessions by user_id")?;

        rows.into_iter().map(session_from_row).collect()
    }

    pub async fn delete_expired(&self) -> Result<u64> {
        let now = format_datetime(&Utc::now());

        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .context("Failed to delete expired sessions")?;

        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete session")?
            .rows_affected();

        if rows_affected == 0 {
            return Err(anyhow::anyhow!("Session not found"));
        }

        Ok(())
    }
}

fn session_from_row(row: SessionRow) -> Result<Session> {
    let (id, user_id, expires_at, created_at) = row;

    Ok(Session {
        id,
        user_id,
        expires_at: parse_datetime(&expires_at, "expires_at")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::connect_in_memory;
    use crate::repositories::UserRepository;
    use bulletin_core::models::user::User;
    use chrono::Duration;

    async fn setup() -> Result<(SqlitePool, i64)> {
        let pool = connect_in_memory().await?;
        let user_id = UserRepository::new(pool.clone())
            .create(&User::new("alice".to_string(), "pw")?)
            .await?;
        Ok((pool, user_id))
    }

    #[tokio::test]
    async fn test_create_and_find_session() -> Result<()> {
        let (pool, user_id) = setup().await?;
        let repo = SessionRepository::new(pool);

        let session = Session::new(user_id);
        repo.create(&session).await?;

        let found = repo.find_by_id(&session.id).await?.expect("session exists");
        assert_eq!(found.user_id, user_id);
        assert_eq!(
            found.expires_at.timestamp_micros(),
            session.expires_at.timestamp_micros()
        );
        assert!(!found.is_expired());

        assert!(repo.find_by_id("missing").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_user_id() -> Result<()> {
        let (pool, user_id) = setup().await?;
        let repo = SessionRepository::new(pool);

        repo.create(&Session::new(user_id)).await?;
        repo.create(&Session::new(user_id)).await?;

        assert_eq!(repo.find_by_user_id(user_id).await?.len(), 2);
        assert!(repo.find_by_user_id(user_id + 1).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_session() -> Result<()> {
        let (pool, user_id) = setup().await?;
        let repo = SessionRepository::new(pool);

        let session = Session::new(user_id);
        repo.create(&session).await?;
        repo.delete(&session.id).await?;

        assert!(repo.find_by_id(&session.id).await?.is_none());
        assert!(repo.delete(&session.id).await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_expired() -> Result<()> {
        let (pool, user_id) = setup().await?;
        let repo = SessionRepository::new(pool);

        let live = Session::new(user_id);
        let stale = Session::new_with_expiry(user_id, Duration::hours(-1));
        repo.create(&live).await?;
        repo.create(&stale).await?;

        assert_eq!(repo.delete_expired().await?, 1);
        assert!(repo.find_by_id(&live.id).await?.is_some());
        assert!(repo.find_by_id(&stale.id).await?.is_none());

        Ok(())
    }
}
