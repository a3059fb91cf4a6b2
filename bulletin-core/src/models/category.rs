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

use serde::{Deserialize, Serialize};

pub const MAX_CATEGORY_NAME_LENGTH: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into().trim().to_string(),
        }
    }

    pub fn is_valid(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Category name cannot be empty".to_string());
        }

        if self.name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
            return Err(format!(
                "Category name cannot exceed {} characters",
                MAX_CATEGORY_NAME_LENGTH
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_name() {
        let category = Category::new("  Ransomware ");
        assert_eq!(category.name, "Ransomware");
        assert!(category.id.is_none());
        assert!(category.is_valid().is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert!(Category::new("   ").is_valid().is_err());

        let too_long = Category::new("x".repeat(MAX_CATEGORY_NAME_LENGTH + 1));
        assert!(too_long.is_valid().unwrap_err().contains("exceed"));
    }
}
