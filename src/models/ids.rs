//! Strongly-typed ID wrappers for all entity types
//!
//! Record-store entities use serial integer ids (1, 2, 3, ...). Newtype
//! wrappers prevent accidentally mixing up IDs from different entity types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw id value
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Get the underlying value
            pub const fn value(&self) -> i64 {
                self.0
            }

            /// Parse an ID from a string ("7" or with the display prefix)
            pub fn parse(s: &str) -> Result<Self, ParseIntError> {
                s.parse()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(GroupId, "grp-");
define_id!(ItemId, "itm-");
define_id!(ManpowerItemId, "mp-");
define_id!(RowId, "row:");

impl RowId {
    /// Rows added ad hoc carry synthetic (negative) ids
    pub const fn is_synthetic(&self) -> bool {
        self.0 < 0
    }
}

impl From<ItemId> for RowId {
    fn from(id: ItemId) -> Self {
        Self(id.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(GroupId::new(3).to_string(), "grp-3");
        assert_eq!(ItemId::new(12).to_string(), "itm-12");
        assert_eq!(RowId::new(-2).to_string(), "row:-2");
        assert_eq!("row:-2".parse::<RowId>().unwrap(), RowId::new(-2));
    }

    #[test]
    fn test_id_parse_with_and_without_prefix() {
        assert_eq!("7".parse::<GroupId>().unwrap(), GroupId::new(7));
        assert_eq!("grp-7".parse::<GroupId>().unwrap(), GroupId::new(7));
        assert_eq!(ItemId::parse(" itm-4 ").unwrap(), ItemId::new(4));
        assert!("grp-x".parse::<GroupId>().is_err());
    }

    #[test]
    fn test_id_serialization() {
        let id = ManpowerItemId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let deserialized: ManpowerItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_row_id_from_item() {
        let row_id = RowId::from(ItemId::new(5));
        assert_eq!(row_id.value(), 5);
        assert!(!row_id.is_synthetic());
        assert!(RowId::new(-1).is_synthetic());
    }
}
