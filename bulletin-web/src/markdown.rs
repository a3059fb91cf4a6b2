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

use pulldown_cmark::{html, Options, Parser};
use std::collections::HashMap;

/// Render an article body to sanitized HTML. Called at display time; the
/// result is never stored.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);

    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, parser);

    // Article bodies are user input
    ammonia::clean(&html_output)
}

/// Tera filter: `{{ article.content | markdown | safe }}`
pub fn make_markdown_filter() -> impl tera::Filter {
    |value: &tera::Value, _: &HashMap<String, tera::Value>| match value {
        tera::Value::String(text) => Ok(tera::Value::String(markdown_to_html(text))),
        tera::Value::Null => Ok(tera::Value::String(String::new())),
        _ => Err(tera::Error::msg("markdown filter expects a string")),
    }
}
