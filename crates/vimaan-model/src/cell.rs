//! Scalar cell values.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single spreadsheet value.
///
/// `Absent` is a value in its own right: it marks a gap in the source and is
/// distinct from an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Absent,
}

impl Cell {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Canonical display string.
    ///
    /// Absent cells render as the empty string. Text is borrowed; every other
    /// variant is formatted without consulting the locale.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Integer(v) => Cow::Owned(v.to_string()),
            Self::Float(v) => Cow::Owned(format_float(*v)),
            Self::Boolean(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Self::Absent => Cow::Borrowed(""),
        }
    }

    /// Comparable form used for grouping.
    pub fn key(&self) -> CellKey {
        match self {
            Self::Text(s) => CellKey::Text(s.clone()),
            Self::Integer(v) => CellKey::Integer(*v),
            Self::Float(v) => CellKey::Float(canonical_float_bits(*v)),
            Self::Boolean(b) => CellKey::Boolean(*b),
            Self::Absent => CellKey::Absent,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Hashable, totally ordered projection of a [`Cell`].
///
/// Values of different variants never compare equal, so `Integer(1)` and
/// `Float(1.0)` are distinct keys, as are `Text("")` and `Absent`. Floats are
/// keyed by bit pattern with `-0.0` folded into `0.0` and every NaN folded into
/// one canonical NaN; the resulting order is deterministic but not numeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellKey {
    Absent,
    Boolean(bool),
    Integer(i64),
    Float(u64),
    Text(String),
}

fn canonical_float_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// Formats a float in its shortest round-trip form, keeping a `.0` suffix on
/// integral values so they stay distinguishable from integers.
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}
