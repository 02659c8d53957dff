//! Bulk duration for man-hour rows

use serde::{Deserialize, Serialize};

use super::derive::{parse_count, recompute};
use super::row::EstimateRow;

/// A days/persons pair applied to every MH row of a working set.
///
/// `Default` is (1, 1). The prompt starts from the default every time it is
/// opened rather than remembering the last values applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDuration {
    pub days: u32,
    pub persons: u32,
}

impl Default for BulkDuration {
    fn default() -> Self {
        Self {
            days: 1,
            persons: 1,
        }
    }
}

impl BulkDuration {
    /// Counts below one are raised to one
    pub fn new(days: u32, persons: u32) -> Self {
        Self {
            days: days.max(1),
            persons: persons.max(1),
        }
    }

    /// Parse from user input, falling back to 1 for anything unusable
    pub fn parse(days: &str, persons: &str) -> Self {
        Self::new(parse_count(days), parse_count(persons))
    }

    /// Apply to a slice of rows. Only MH rows change; returns how many did.
    pub fn apply(&self, rows: &mut [EstimateRow]) -> usize {
        let mut applied = 0;
        for row in rows.iter_mut().filter(|r| r.is_man_hour()) {
            row.days = self.days;
            row.persons = self.persons;
            *row = recompute(row);
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, RowId};
    use rust_decimal::Decimal;

    fn row(id: i64, unit: &str, cents: i64) -> EstimateRow {
        let mut row = EstimateRow::blank(RowId::new(id));
        row.unit = unit.into();
        row.unit_rate = Money::from_cents(cents);
        recompute(&row)
    }

    #[test]
    fn test_default_is_one_by_one() {
        assert_eq!(BulkDuration::default(), BulkDuration::new(1, 1));
        assert_eq!(BulkDuration::new(0, 0), BulkDuration::default());
        assert_eq!(BulkDuration::parse("3", "x"), BulkDuration::new(3, 1));
    }

    #[test]
    fn test_apply_only_touches_man_hour_rows() {
        let mut ea = row(-2, "EA", 2000);
        ea.total_hours = Decimal::from(5);
        let ea = recompute(&ea);
        let mut rows = vec![row(-1, "MH", 5000), ea.clone()];

        let applied = BulkDuration::new(3, 2).apply(&mut rows);
        assert_eq!(applied, 1);
        assert_eq!(rows[0].total_hours, Decimal::from(60));
        assert_eq!(rows[0].total_value, Money::from_cents(300000));
        assert_eq!(rows[1], ea);
    }
}
