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
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use bulletin_core::models::{session::Session, user::User};

use crate::{
    error::AppError,
    flash::{self, FlashMessage},
    session::{end_session, get_current_user, session_id},
    AppState,
};

/// Current authenticated user, extracted from request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session: Session,
}

/// Why a request could not be tied to a user.
pub enum AuthRejection {
    /// No live session: send the visitor home with a notice.
    LoginRequired(SignedCookieJar),
    Internal(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::LoginRequired(jar) => {
                let jar = flash::push(
                    end_session(jar),
                    FlashMessage::warning("Please log in to access this page."),
                );
                (jar, Redirect::to("/")).into_response()
            }
            AuthRejection::Internal(err) => err.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = SignedCookieJar::from_headers(&parts.headers, app_state.cookie_key.clone());

        let Some(id) = session_id(&jar) else {
            return Err(AuthRejection::LoginRequired(jar));
        };

        match get_current_user(&app_state.db, &id).await {
            Ok(Some((user, session))) => Ok(CurrentUser { user, session }),
            Ok(None) => Err(AuthRejection::LoginRequired(jar)),
            Err(e) => Err(AuthRejection::Internal(e.into())),
        }
    }
}

/// Optional authenticated user
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

impl OptionalUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref().map(|current| &current.user)
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(OptionalUser(Some(user))),
            Err(AuthRejection::LoginRequired(_)) => Ok(OptionalUser(None)),
            Err(AuthRejection::Internal(e)) => Err(e),
        }
    }
}
