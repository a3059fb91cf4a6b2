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
use bulletin_core::User;
use tera::Context;

use crate::{error::AppError, flash::FlashMessage, AppState};

pub const SITE_TITLE: &str = "Bulletin";

/// Variables every page expects: site title, the logged-in user (or
/// null) and this request's flash messages.
pub fn base_context(user: Option<&User>, messages: &[FlashMessage]) -> Context {
    let mut context = Context::new();
    context.insert("site_title", SITE_TITLE);
    context.insert("current_user", &user);
    context.insert("messages", messages);
    context
}

pub fn render_page(
    state: &AppState,
    template_name: &str,
    context: &Context,
) -> Result<Html<String>, AppError> {
    state
        .templates
        .render(template_name, context)
        .map(Html)
        .map_err(|e| {
            AppError::internal_server_error("Failed to render page")
                .with_details(format!("{}: {:?}", template_name, e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_context_hides_password_hash() -> anyhow::Result<()> {
        let user = User::new("alice".to_string(), "secret")?;
        let context = base_context(Some(&user), &[FlashMessage::info("hi")]);
        let json = context.into_json();

        assert_eq!(json["site_title"], "Bulletin");
        assert_eq!(json["current_user"]["username"], "alice");
        assert!(json["current_user"].get("password_hash").is_none());
        assert_eq!(json["messages"][0]["level"], "info");
        Ok(())
    }

    #[test]
    fn test_anonymous_context() {
        let json = base_context(None, &[]).into_json();
        assert!(json["current_user"].is_null());
        assert_eq!(json["messages"].as_array().map(|m| m.len()), Some(0));
    }
}
