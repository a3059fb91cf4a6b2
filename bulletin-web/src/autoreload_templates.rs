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

use anyhow::{anyhow, Result};
use std::sync::{Arc, RwLock};
use tera::{Context, Tera};

use crate::markdown::make_markdown_filter;

/// A wrapper around Tera that can reload templates in development mode
#[derive(Clone)]
pub enum TemplateEngine {
    /// Templates parsed once at startup
    Static(Arc<Tera>),
    /// Templates re-parsed from disk before each render
    Reloadable {
        templates_dir: String,
        cached: Arc<RwLock<Tera>>,
    },
}

impl TemplateEngine {
    pub fn new(templates_dir: &str, development_mode: bool) -> Result<Self> {
        let tera = Self::create_tera_instance(templates_dir)?;

        if development_mode {
            tracing::info!("Template hot reload enabled (development mode)");
            Ok(Self::Reloadable {
                templates_dir: templates_dir.to_string(),
                cached: Arc::new(RwLock::new(tera)),
            })
        } else {
            tracing::info!("Templates loaded once (production mode)");
            Ok(Self::Static(Arc::new(tera)))
        }
    }

    fn create_tera_instance(templates_dir: &str) -> Result<Tera> {
        let pattern = format!("{}/**/*.html", templates_dir);
        let mut tera = Tera::new(&pattern)?;
        tera.register_filter("markdown", make_markdown_filter());
        Ok(tera)
    }

    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        match self {
            Self::Static(tera) => Ok(tera.render(template_name, context)?),
            Self::Reloadable {
                templates_dir,
                cached,
            } => {
                match Self::create_tera_instance(templates_dir) {
                    Ok(fresh) => {
                        let mut guard = cached
                            .write()
                            .map_err(|_| anyhow!("Template cache lock poisoned"))?;
                        *guard = fresh;
                    }
                    Err(e) => {
                        // Keep serving the last good set while the file is mid-edit
                        tracing::warn!("Failed to reload templates: {}. Using cached version.", e);
                    }
                }

                let guard = cached
                    .read()
                    .map_err(|_| anyhow!("Template cache lock poisoned"))?;
                Ok(guard.render(template_name, context)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_static_engine_renders_markdown_filter() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("body.html"), "{{ text | markdown | safe }}")?;

        let engine = TemplateEngine::new(dir.path().to_str().unwrap_or("."), false)?;
        let mut context = Context::new();
        context.insert("text", "**bold**");

        let out = engine.render("body.html", &context)?;
        assert!(out.contains("<strong>bold</strong>"));
        Ok(())
    }

    #[test]
    fn test_reloadable_engine_picks_up_changes() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("greeting.html");
        fs::write(&path, "Hello")?;

        let engine = TemplateEngine::new(dir.path().to_str().unwrap_or("."), true)?;
        assert_eq!(engine.render("greeting.html", &Context::new())?, "Hello");

        fs::write(&path, "Goodbye")?;
        assert_eq!(engine.render("greeting.html", &Context::new())?, "Goodbye");
        Ok(())
    }

    #[test]
    fn test_static_engine_ignores_changes() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("greeting.html");
        fs::write(&path, "Hello")?;

        let engine = TemplateEngine::new(dir.path().to_str().unwrap_or("."), false)?;
        fs::write(&path, "Goodbye")?;
        assert_eq!(engine.render("greeting.html", &Context::new())?, "Hello");
        Ok(())
    }

    #[test]
    fn test_reloadable_engine_keeps_last_good_set() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("greeting.html");
        fs::write(&path, "Hello")?;

        let engine = TemplateEngine::new(dir.path().to_str().unwrap_or("."), true)?;
        fs::write(&path, "{% if %}")?;
        assert_eq!(engine.render("greeting.html", &Context::new())?, "Hello");
        Ok(())
    }
}
