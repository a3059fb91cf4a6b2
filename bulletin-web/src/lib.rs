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

pub mod auth;
pub mod autoreload_templates;
pub mod config;
pub mod error;
pub mod error_middleware;
pub mod flash;
pub mod forms;
pub mod handlers;
pub mod logging;
pub mod markdown;
pub mod request_logging;
pub mod routes;
pub mod session;
pub mod state;
pub mod template_context;
pub mod templates;

#[cfg(test)]
pub mod test_helpers;

pub use config::Config;
pub use state::AppState;
