//! Derived-value computation for estimate rows
//!
//! `recompute` is a pure, total function: it never fails and a second pass
//! over its own output changes nothing. Every operation that mutates a
//! working set runs it over the affected rows before returning.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::row::EstimateRow;
use crate::models::{is_man_hour_unit, Money, HOURS_PER_PERSON_DAY};

/// Recompute the derived fields of a row.
///
/// Days and persons are clamped to at least one. On MH rows total hours are
/// `days × persons × 10`; on every other row they keep their value (negative
/// becomes zero). Total value is always `total_hours × unit_rate`, with
/// overflow yielding zero.
pub fn recompute(row: &EstimateRow) -> EstimateRow {
    let mut out = row.clone();
    out.days = out.days.max(1);
    out.persons = out.persons.max(1);

    if is_man_hour_unit(&out.unit) {
        out.total_hours = man_hours(out.days, out.persons);
    }
    if out.total_hours.is_sign_negative() {
        out.total_hours = Decimal::ZERO;
    }

    out.total_value = out.unit_rate.times(out.total_hours);
    out
}

/// Run `recompute` over every row in place
pub fn recompute_all(rows: &mut [EstimateRow]) {
    for row in rows.iter_mut() {
        *row = recompute(row);
    }
}

/// `days × persons × 10`, or zero on overflow
pub fn man_hours(days: u32, persons: u32) -> Decimal {
    u64::from(days)
        .checked_mul(u64::from(persons))
        .and_then(|v| v.checked_mul(u64::from(HOURS_PER_PERSON_DAY)))
        .map(Decimal::from)
        .unwrap_or(Decimal::ZERO)
}

/// Parse a days/persons count; anything unusable becomes 1.
///
/// Fractional input is truncated, then clamped to at least 1.
pub fn parse_count(input: &str) -> u32 {
    let trimmed = input.trim();
    if let Ok(n) = trimmed.parse::<u32>() {
        return n.max(1);
    }
    Decimal::from_str(trimmed)
        .ok()
        .and_then(|d| d.trunc().to_u32())
        .map(|n| n.max(1))
        .unwrap_or(1)
}

/// Parse a free-form hours value; unparsable or negative input becomes 0
pub fn parse_hours(input: &str) -> Decimal {
    match Decimal::from_str(input.trim()) {
        Ok(hours) if !hours.is_sign_negative() => hours.normalize(),
        _ => Decimal::ZERO,
    }
}

/// Parse a unit rate; unparsable or negative input becomes 0.00
pub fn parse_rate(input: &str) -> Money {
    Money::parse_rate_lenient(input)
}
