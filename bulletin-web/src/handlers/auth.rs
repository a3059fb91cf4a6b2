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
    Form,
};
use axum_extra::extract::SignedCookieJar;
use bulletin_core::{FieldErrors, Session, User};
use bulletin_db::repositories::{is_unique_violation, SessionRepository, UserRepository};
use chrono::Duration;
use tracing::{info, warn};

use crate::{
    auth::OptionalUser,
    error::AppError,
    flash::{self, FlashMessage},
    forms::{LoginForm, RegisterForm},
    session::{end_session, session_id, start_session},
    template_context::{base_context, render_page},
    AppState,
};

const USERNAME_TAKEN: &str = "Username is already taken";
const INVALID_CREDENTIALS: &str = "Invalid username or password.";

fn render_register(
    state: &AppState,
    user: Option<&User>,
    messages: &[FlashMessage],
    username: &str,
    errors: &FieldErrors,
) -> Result<axum::response::Html<String>, AppError> {
    let mut context = base_context(user, messages);
    context.insert("username", username);
    context.insert("errors", errors);
    render_page(state, "register.html", &context)
}

fn render_login(
    state: &AppState,
    user: Option<&User>,
    messages: &[FlashMessage],
    username: &str,
) -> Result<axum::response::Html<String>, AppError> {
    let mut context = base_context(user, messages);
    context.insert("username", username);
    render_page(state, "login.html", &context)
}

/// Display registration form
pub async fn register_form(
    State(state): State<AppState>,
    current: OptionalUser,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let (jar, messages) = flash::take(jar);
    let html = render_register(&state, current.user(), &messages, "", &FieldErrors::new())?;
    Ok((jar, html).into_response())
}

/// Handle registration POST request
pub async fn register(
    State(state): State<AppState>,
    current: OptionalUser,
    jar: SignedCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let user_repo = UserRepository::new(state.db.clone());
    let username = form.username.trim().to_string();

    let mut errors = FieldErrors::new();
    let mut add = |field: &str, message: &str| {
        errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    };

    if let Err(e) = User::validate_username(&username) {
        add("username", &e);
    } else if user_repo.username_exists(&username).await? {
        add("username", USERNAME_TAKEN);
    }
    if form.password.is_empty() {
        add("password", "Password is required");
    }
    if form.password != form.confirm_password {
        add("confirm_password", "Passwords must match");
    }

    if errors.is_empty() {
        let user = User::new(username.clone(), &form.password)?;
        match user_repo.create(&user).await {
            Ok(user_id) => {
                info!(user_id, username = %username, "User registered");
                let jar = flash::push(
                    jar,
                    FlashMessage::success("Registration successful. Please log in."),
                );
                return Ok((jar, Redirect::to("/login")).into_response());
            }
            // Lost a race with a concurrent registration of the same name
            Err(e) if is_unique_violation(&e) => {
                errors
                    .entry("username".to_string())
                    .or_default()
                    .push(USERNAME_TAKEN.to_string());
            }
            Err(e) => return Err(e.into()),
        }
    }

    let (jar, mut messages) = flash::take(jar);
    messages.push(FlashMessage::error("Please correct the errors below."));
    let html = render_register(&state, current.user(), &messages, &username, &errors)?;
    Ok((jar, html).into_response())
}

/// Display login form
pub async fn login_form(
    State(state): State<AppState>,
    current: OptionalUser,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let (jar, messages) = flash::take(jar);
    let html = render_login(&state, current.user(), &messages, "")?;
    Ok((jar, html).into_response())
}

/// Handle login POST request
pub async fn login(
    State(state): State<AppState>,
    current: OptionalUser,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();
    let user = UserRepository::new(state.db.clone())
        .find_by_username(username)
        .await?;

    let verified = match &user {
        Some(user) => match user.verify_password(&form.password) {
            Ok(ok) => ok,
            Err(e) => {
                warn!(username = %user.username, "Unusable password hash: {:?}", e);
                false
            }
        },
        None => false,
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            info!(username = %username, "Failed login attempt");
            let (jar, mut messages) = flash::take(jar);
            messages.push(FlashMessage::error(INVALID_CREDENTIALS));
            let html = render_login(&state, current.user(), &messages, username)?;
            return Ok((jar, html).into_response());
        }
    };

    let user_id = user
        .id
        .ok_or_else(|| AppError::internal_server_error("Stored user has no id"))?;
    let session = Session::new_with_expiry(
        user_id,
        Duration::hours(state.config.session_lifetime_hours),
    );
    SessionRepository::new(state.db.clone())
        .create(&session)
        .await?;

    info!(user_id, username = %user.username, "User logged in");

    let jar = start_session(jar, &session);
    let jar = flash::push(
        jar,
        FlashMessage::success(format!("Welcome back, {}!", user.username)),
    );
    Ok((jar, Redirect::to("/")).into_response())
}

/// Handle logout
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    if let Some(id) = session_id(&jar) {
        // Already gone is fine
        if let Err(e) = SessionRepository::new(state.db.clone()).delete(&id).await {
            tracing::debug!("Session not deleted on logout: {:?}", e);
        }
    }

    let jar = flash::push(end_session(jar), FlashMessage::info("You have been logged out."));
    Ok((jar, Redirect::to("/")).into_response())
}
