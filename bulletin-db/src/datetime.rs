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
use chrono::{DateTime, SecondsFormat, Utc};

/// Fixed-width RFC3339 so that text ordering matches time ordering.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp written either by us (RFC3339) or by a
/// SQLite `datetime('now')` default.
pub fn parse_datetime(value: &str, column: &str) -> Result<DateTime<Utc>> {
    if value.contains('T') {
        Ok(DateTime::parse_from_rfc3339(value)
            .with_context(|| format!("Failed to parse {} as RFC3339", column))?
            .with_timezone(&Utc))
    } else {
        Ok(
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .with_context(|| format!("Failed to parse {} as SQLite format", column))?
                .and_utc(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_is_fixed_width() {
        let a = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_datetime(&a), "2025-01-02T03:04:05.000000Z");
    }

    #[test]
    fn test_parse_both_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        assert_eq!(
            parse_datetime("2025-01-02T03:04:05.000000Z", "created_at").unwrap(),
            expected
        );
        assert_eq!(
            parse_datetime("2025-01-02 03:04:05", "created_at").unwrap(),
            expected
        );
        assert!(parse_datetime("yesterday", "created_at").is_err());
    }

    #[test]
    fn test_round_trip() {
        let now = Utc::now();
        let parsed = parse_datetime(&format_datetime(&now), "publish_date").unwrap();
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
    }
}
