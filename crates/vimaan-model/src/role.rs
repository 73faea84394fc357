//! Semantic roles a spreadsheet column can be mapped to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A semantic field that must be bound to a source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    City,
    State,
    Country,
    AirportCode,
}

/// Returned when a role name does not match any known role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}' (expected city, state, country or airport_code)")]
pub struct UnknownRole(pub String);

/// Whether a role describes source data or a column to be filled downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Input,
    Output,
}

impl Role {
    /// Every role, in canonical order.
    pub const ALL: [Role; 4] = [Role::City, Role::State, Role::Country, Role::AirportCode];

    /// The place-name roles that identify a record.
    pub const INPUTS: [Role; 3] = [Role::City, Role::State, Role::Country];

    #[must_use]
    pub const fn kind(self) -> RoleKind {
        match self {
            Self::City | Self::State | Self::Country => RoleKind::Input,
            Self::AirportCode => RoleKind::Output,
        }
    }

    /// Stable identifier used in config files and on the command line.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::State => "state",
            Self::Country => "country",
            Self::AirportCode => "airport_code",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::City => "City Name",
            Self::State => "State Name",
            Self::Country => "Country Name",
            Self::AirportCode => "Nearest Airport IATA",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "city" => Ok(Self::City),
            "state" => Ok(Self::State),
            "country" => Ok(Self::Country),
            "airport_code" | "airport" | "iata" => Ok(Self::AirportCode),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}
