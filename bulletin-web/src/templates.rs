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
use std::path::Path;

use crate::autoreload_templates::TemplateEngine;

/// Templates shipped with the binary, written out on first start so they
/// can be customized in place.
const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("home.html", include_str!("../../templates/home.html")),
    ("article.html", include_str!("../../templates/article.html")),
    ("publish.html", include_str!("../../templates/publish.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("register.html", include_str!("../../templates/register.html")),
    ("error.html", include_str!("../../templates/error.html")),
];

pub fn init_templates(templates_dir: &str, development_mode: bool) -> Result<TemplateEngine> {
    std::fs::create_dir_all(templates_dir).context("Failed to create templates directory")?;

    create_default_templates(templates_dir)?;

    TemplateEngine::new(templates_dir, development_mode)
}

fn create_default_templates(templates_dir: &str) -> Result<()> {
    let base_dir = Path::new(templates_dir);

    for (name, contents) in DEFAULT_TEMPLATES {
        let path = base_dir.join(name);
        if !path.exists() {
            tracing::info!("Writing default template {}", path.display());
            std::fs::write(&path, contents)
                .with_context(|| format!("Failed to create template {}", name))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_templates_writes_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let templates_dir = dir.path().join("templates");
        let templates_dir = templates_dir.to_str().unwrap_or("templates");

        init_templates(templates_dir, false)?;

        for (name, _) in DEFAULT_TEMPLATES {
            assert!(Path::new(templates_dir).join(name).exists(), "{} missing", name);
        }
        Ok(())
    }

    #[test]
    fn test_existing_templates_are_not_overwritten() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let templates_dir = dir.path().to_str().unwrap_or(".");
        let custom = "{% extends \"base.html\" %}{% block content %}custom{% endblock %}";
        std::fs::write(dir.path().join("error.html"), custom)?;

        init_templates(templates_dir, false)?;

        assert_eq!(std::fs::read_to_string(dir.path().join("error.html"))?, custom);
        Ok(())
    }
}
