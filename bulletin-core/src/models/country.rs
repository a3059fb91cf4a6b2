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

/// Separator used when a country selection is stored as a single column
pub const COUNTRY_SEPARATOR: &str = ", ";

/// Countries offered by the article forms. Names never contain a comma.
pub const COUNTRIES: &[&str] = &[
    "Afghanistan", "Albania", "Algeria", "Andorra", "Angola", "Argentina", "Armenia",
    "Australia", "Austria", "Azerbaijan", "Bahamas", "Bahrain", "Bangladesh", "Belarus",
    "Belgium", "Bolivia", "Bosnia and Herzegovina", "Brazil", "Bulgaria", "Cambodia",
    "Cameroon", "Canada", "Chile", "China", "Colombia", "Costa Rica", "Croatia", "Cuba",
    "Cyprus", "Czech Republic", "Denmark", "Dominican Republic", "Ecuador", "Egypt",
    "El Salvador", "Estonia", "Ethiopia", "Finland", "France", "Georgia", "Germany", "Ghana",
    "Greece", "Guatemala", "Honduras", "Hong Kong", "Hungary", "Iceland", "India",
    "Indonesia", "Iran", "Iraq", "Ireland", "Israel", "Italy", "Jamaica", "Japan", "Jordan",
    "Kazakhstan", "Kenya", "Kuwait", "Latvia", "Lebanon", "Libya", "Lithuania",
    "Luxembourg", "Malaysia", "Malta", "Mexico", "Moldova", "Monaco", "Mongolia",
    "Montenegro", "Morocco", "Myanmar", "Nepal", "Netherlands", "New Zealand", "Nigeria",
    "North Korea", "North Macedonia", "Norway", "Oman", "Pakistan", "Palestine", "Panama",
    "Paraguay", "Peru", "Philippines", "Poland", "Portugal", "Qatar", "Romania", "Russia",
    "Saudi Arabia", "Senegal", "Serbia", "Singapore", "Slovakia", "Slovenia",
    "South Africa", "South Korea", "Spain", "Sri Lanka", "Sudan", "Sweden", "Switzerland",
    "Syria", "Taiwan", "Thailand", "Tunisia", "Turkey", "Ukraine", "United Arab Emirates",
    "United Kingdom", "United States", "Uruguay", "Uzbekistan", "Venezuela", "Vietnam",
    "Yemen", "Zimbabwe",
];

/// An ordered, duplicate-free selection of country names.
///
/// Stored as one comma-joined string (`"France, Germany"`); there is no
/// relational integrity on the names themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryList(Vec<String>);

impl CountryList {
    /// Build a list from form selections, trimming names and dropping
    /// blanks and repeats.
    pub fn from_selection<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut countries: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !countries.iter().any(|c| c == name) {
                countries.push(name.to_string());
            }
        }
        Self(countries)
    }

    /// Decode a stored column value.
    pub fn decode(stored: &str) -> Self {
        Self::from_selection(stored.split(','))
    }

    /// Encode for storage. Callers validate first; a name containing a
    /// comma would not survive decoding.
    pub fn encode(&self) -> String {
        self.0.join(COUNTRY_SEPARATOR)
    }

    pub fn validate(&self) -> Result<(), String> {
        match self.0.iter().find(|name| name.contains(',')) {
            Some(name) => Err(format!("Country name cannot contain a comma: {}", name)),
            None => Ok(()),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_joins_with_comma_space() {
        let countries = CountryList::from_selection(["France", "Germany"]);
        assert_eq!(countries.encode(), "France, Germany");
    }

    #[test]
    fn test_decode_round_trips_selection() {
        let decoded = CountryList::decode("France, Germany");
        assert_eq!(decoded.names(), &["France".to_string(), "Germany".to_string()]);
        assert_eq!(decoded, CountryList::from_selection(["France", "Germany"]));
    }

    #[test]
    fn test_decode_tolerates_loose_spacing() {
        let decoded = CountryList::decode(" France ,Germany,, ");
        assert_eq!(decoded.encode(), "France, Germany");
    }

    #[test]
    fn test_empty_selection() {
        let empty = CountryList::from_selection(Vec::<String>::new());
        assert!(empty.is_empty());
        assert_eq!(empty.encode(), "");
        assert!(CountryList::decode("").is_empty());
    }

    #[test]
    fn test_duplicates_removed() {
        let countries = CountryList::from_selection(["Spain", "Spain", " Spain", "Italy"]);
        assert_eq!(countries.encode(), "Spain, Italy");
    }

    #[test]
    fn test_validate_rejects_commas() {
        let countries = CountryList::from_selection(["Korea, Republic of"]);
        assert!(countries.validate().is_err());
        assert!(CountryList::from_selection(["Japan"]).validate().is_ok());
    }

    #[test]
    fn test_offered_countries_are_encodable() {
        assert!(COUNTRIES.iter().all(|name| !name.contains(',')));
        let all = CountryList::from_selection(COUNTRIES.iter());
        assert_eq!(CountryList::decode(&all.encode()), all);
    }
}
