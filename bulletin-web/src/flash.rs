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

//! One-shot notices carried to the next rendered page in a signed cookie.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

impl FlashMessage {
    pub fn new(level: FlashLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(FlashLevel::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(FlashLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(FlashLevel::Error, text)
    }
}

/// Pending messages without consuming them. A tampered or undecodable
/// cookie reads as empty.
pub fn peek(jar: &SignedCookieJar) -> Vec<FlashMessage> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| decode(cookie.value()))
        .unwrap_or_default()
}

/// Queue a message for the next rendered page.
pub fn push(jar: SignedCookieJar, message: FlashMessage) -> SignedCookieJar {
    let mut messages = peek(&jar);
    messages.push(message);

    match encode(&messages) {
        Ok(value) => jar.add(
            Cookie::build((FLASH_COOKIE, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build(),
        ),
        Err(e) => {
            tracing::warn!("Failed to encode flash messages: {:?}", e);
            jar
        }
    }
}

/// Consume pending messages; the cookie is cleared in the returned jar.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Vec<FlashMessage>) {
    let messages = peek(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, messages);
    }

    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, messages)
}

fn encode(messages: &[FlashMessage]) -> serde_json::Result<String> {
    Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(messages)?))
}

fn decode(value: &str) -> Option<Vec<FlashMessage>> {
    let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(messages) => Some(messages),
        Err(e) => {
            tracing::debug!("Discarding unreadable flash cookie: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::derive_cookie_key;
    use pretty_assertions::assert_eq;

    fn jar() -> SignedCookieJar {
        SignedCookieJar::new(derive_cookie_key("flash-test"))
    }

    #[test]
    fn test_push_accumulates_in_order() {
        let jar = push(jar(), FlashMessage::success("Saved"));
        let jar = push(jar, FlashMessage::warning("Careful"));

        assert_eq!(
            peek(&jar),
            vec![FlashMessage::success("Saved"), FlashMessage::warning("Careful")]
        );
    }

    #[test]
    fn test_take_clears_messages() {
        let jar = push(jar(), FlashMessage::info("Logged out"));

        let (jar, messages) = take(jar);
        assert_eq!(messages, vec![FlashMessage::info("Logged out")]);
        assert!(jar.get(FLASH_COOKIE).is_none());

        let (_, again) = take(jar);
        assert!(again.is_empty());
    }

    #[test]
    fn test_garbage_cookie_reads_as_empty() {
        let jar = jar().add(Cookie::new(FLASH_COOKIE, "%%% not base64 %%%"));
        assert!(peek(&jar).is_empty());

        let jar = jar.add(Cookie::new(FLASH_COOKIE, URL_SAFE_NO_PAD.encode("not json")));
        assert!(peek(&jar).is_empty());
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_string(&FlashMessage::error("Nope")).unwrap_or_default();
        assert_eq!(json, r#"{"level":"error","text":"Nope"}"#);
    }
}
