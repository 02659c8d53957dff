//! Unit-of-measure codes
//!
//! The item form accepts a closed set of unit codes. Only the man-hour unit
//! changes how a row is derived; every other code treats total hours as a
//! free-form quantity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The man-hour unit code
pub const MAN_HOUR_UNIT: &str = "MH";

/// Hours credited per person per day on man-hour rows
pub const HOURS_PER_PERSON_DAY: u32 = 10;

/// Whether a unit string is the man-hour unit.
///
/// This is the only place the MH/non-MH branch is decided; derivation, bulk
/// duration and display all call it.
pub fn is_man_hour_unit(unit: &str) -> bool {
    unit == MAN_HOUR_UNIT
}

/// Recognised unit codes for group items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitCode {
    /// Man-hours
    Mh,
    /// Each
    Ea,
    /// Lump sum
    Ls,
    /// Linear metre
    Lm,
    /// Cubic metre
    Cum,
    /// Square metre
    Sqm,
}

impl UnitCode {
    /// All codes in form order
    pub fn all() -> &'static [Self] {
        &[Self::Mh, Self::Ea, Self::Ls, Self::Lm, Self::Cum, Self::Sqm]
    }

    /// The code as stored on items and rows
    pub fn code(&self) -> &'static str {
        match self {
            Self::Mh => MAN_HOUR_UNIT,
            Self::Ea => "EA",
            Self::Ls => "LS",
            Self::Lm => "LM",
            Self::Cum => "CUM",
            Self::Sqm => "SQM",
        }
    }

    /// Comma-separated list of all codes, for error messages and help text
    pub fn choices() -> String {
        Self::all()
            .iter()
            .map(|u| u.code())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for UnitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for UnitCode {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::all()
            .iter()
            .copied()
            .find(|u| u.code() == wanted)
            .ok_or_else(|| UnknownUnit(s.trim().to_string()))
    }
}

/// Error returned for a unit outside the recognised set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUnit(pub String);

impl fmt::Display for UnknownUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown unit '{}' (expected one of: {})",
            self.0,
            UnitCode::choices()
        )
    }
}

impl std::error::Error for UnknownUnit {}
