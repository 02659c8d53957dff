//! Manpower catalogue model
//!
//! Manpower items are rated labour roles (e.g. "Welder", "Rigger") organised
//! by category. They are imported in bulk and browsed by category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ManpowerItemId;
use super::money::Money;

/// A rated labour role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManpowerItem {
    /// Serial identifier
    pub id: ManpowerItemId,

    /// Catalogue code
    pub code: String,

    /// Role description
    pub description: String,

    /// Category used to group the catalogue
    pub category: String,

    /// Rate per unit
    pub rate: Money,

    /// When the item was created
    pub created_at: DateTime<Utc>,
}

impl ManpowerItem {
    /// Create a new manpower item
    pub fn new(
        id: ManpowerItemId,
        code: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        rate: Money,
    ) -> Self {
        Self {
            id,
            code: code.into().trim().to_string(),
            description: description.into().trim().to_string(),
            category: category.into().trim().to_string(),
            rate: rate.to_rate_scale(),
            created_at: Utc::now(),
        }
    }

    /// Validate the item
    pub fn validate(&self) -> Result<(), ManpowerValidationError> {
        if self.code.is_empty() {
            return Err(ManpowerValidationError::EmptyCode);
        }
        if self.description.is_empty() {
            return Err(ManpowerValidationError::EmptyDescription);
        }
        if self.category.is_empty() {
            return Err(ManpowerValidationError::EmptyCategory);
        }
        if self.rate.is_negative() {
            return Err(ManpowerValidationError::NegativeRate);
        }
        Ok(())
    }
}

impl fmt::Display for ManpowerItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.description)
    }
}

/// A category and its items, as shown by the catalogue listing
#[derive(Debug, Clone, Serialize)]
pub struct ManpowerCategory {
    pub name: String,
    pub items: Vec<ManpowerItem>,
}

/// Validation errors for manpower items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManpowerValidationError {
    EmptyCode,
    EmptyDescription,
    EmptyCategory,
    NegativeRate,
}

impl fmt::Display for ManpowerValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCode => write!(f, "Manpower code is required"),
            Self::EmptyDescription => write!(f, "Manpower description is required"),
            Self::EmptyCategory => write!(f, "Manpower category is required"),
            Self::NegativeRate => write!(f, "Manpower rate cannot be negative"),
        }
    }
}

impl std::error::Error for ManpowerValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_and_scales() {
        let item = ManpowerItem::new(
            ManpowerItemId::new(1),
            " W-01 ",
            "Welder ",
            " Mechanical",
            Money::parse("35").unwrap(),
        );
        assert_eq!(item.code, "W-01");
        assert_eq!(item.category, "Mechanical");
        assert_eq!(item.rate.amount().to_string(), "35.00");
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut item = ManpowerItem::new(
            ManpowerItemId::new(1),
            "R-01",
            "Rigger",
            "Lifting",
            Money::from_cents(3000),
        );
        item.category.clear();
        assert_eq!(item.validate(), Err(ManpowerValidationError::EmptyCategory));

        item.category = "Lifting".into();
        item.rate = Money::from_cents(-5);
        assert_eq!(item.validate(), Err(ManpowerValidationError::NegativeRate));
    }
}
