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

use anyhow::Result;
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use bulletin_core::{Session, User};
use bulletin_db::repositories::{SessionRepository, UserRepository};
use sqlx::SqlitePool;

pub const SESSION_COOKIE: &str = "session_id";

/// Session id carried by the request, if its signature checks out.
pub fn session_id(jar: &SignedCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string())
}

/// Set the browser-session cookie. Expiry is enforced server-side.
pub fn start_session(jar: SignedCookieJar, session: &Session) -> SignedCookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, session.id.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

pub fn end_session(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Resolve a session id to its live session and user. Unknown and expired
/// sessions resolve to `None`.
pub async fn get_current_user(db: &SqlitePool, session_id: &str) -> Result<Option<(User, Session)>> {
    let session_repo = SessionRepository::new(db.clone());
    let Some(session) = session_repo.find_by_id(session_id).await? else {
        return Ok(None);
    };

    if session.is_expired() {
        tracing::debug!(user_id = session.user_id, "Ignoring expired session");
        return Ok(None);
    }

    let user_repo = UserRepository::new(db.clone());
    Ok(user_repo
        .find_by_id(session.user_id)
        .await?
        .map(|user| (user, session)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::derive_cookie_key;
    use bulletin_db::connect_in_memory;
    use chrono::Duration;

    #[test]
    fn test_session_cookie_roundtrip() {
        let jar = SignedCookieJar::new(derive_cookie_key("session-test"));
        let session = Session::new(7);

        let jar = start_session(jar, &session);
        assert_eq!(session_id(&jar), Some(session.id.clone()));

        let jar = end_session(jar);
        assert_eq!(session_id(&jar), None);
    }

    #[tokio::test]
    async fn test_get_current_user() -> Result<()> {
        let pool = connect_in_memory().await?;
        let user_id = UserRepository::new(pool.clone())
            .create(&User::new("alice".to_string(), "pw")?)
            .await?;
        let sessions = SessionRepository::new(pool.clone());

        let live = Session::new(user_id);
        let stale = Session::new_with_expiry(user_id, Duration::hours(-1));
        sessions.create(&live).await?;
        sessions.create(&stale).await?;

        let (user, session) = get_current_user(&pool, &live.id).await?.expect("live session");
        assert_eq!(user.username, "alice");
        assert_eq!(session.id, live.id);

        assert!(get_current_user(&pool, &stale.id).await?.is_none());
        assert!(get_current_user(&pool, "unknown").await?.is_none());

        Ok(())
    }
}
