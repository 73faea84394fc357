//! Column-name synonyms for each role.

use vimaan_model::Role;

/// Normalized names a column commonly carries for `role`.
pub fn role_synonyms(role: Role) -> &'static [&'static str] {
    match role {
        Role::City => &[
            "city",
            "city name",
            "cityname",
            "town",
            "municipality",
            "locality",
        ],
        Role::State => &[
            "state",
            "state name",
            "statename",
            "province",
            "region",
            "state province",
        ],
        Role::Country => &["country", "country name", "countryname", "nation"],
        Role::AirportCode => &[
            "iata",
            "iata code",
            "airport",
            "airport code",
            "nearest airport",
            "nearest airport iata",
        ],
    }
}

/// Lowercases and collapses separators so `City_Name` and `city name` compare equal.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
