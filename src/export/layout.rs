//! Spreadsheet layout for the consolidated estimate
//!
//! `build_export_document` turns a ledger into a format-neutral document:
//! cells, merges and size hints. Writers in sibling modules serialize it.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::estimate::{ConsolidationLedger, EstimateRow};
use crate::models::Money;

/// Number of columns in both estimate and MTO sheets
pub const COLUMN_COUNT: u16 = 7;

/// Sheet name of the consolidated estimate workbook
pub const MANHOURS_SHEET: &str = "Manhours";

const MANHOURS_WIDTHS: [f64; COLUMN_COUNT as usize] = [15.0, 40.0, 18.0, 8.0, 16.0, 16.0, 18.0];
const HEADER_HEIGHT: f64 = 28.0;
const HEADING_HEIGHT: f64 = 28.0;
const DATA_HEIGHT: f64 = 20.0;

/// A column title with its width hint (in characters)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportColumn {
    pub title: String,
    pub width: f64,
}

/// What a row represents, which decides its formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowKind {
    /// Sheet title above the header (MTO only)
    Title,
    Header,
    /// Group name spanning all columns
    GroupHeading,
    /// Fixed section label (MTO only)
    Section(SectionStyle),
    Data,
}

/// Styling of the fixed MTO section rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionStyle {
    /// Fill colour as 0xRRGGBB
    pub fill: Option<u32>,
    pub italic: bool,
}

/// One cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExportCell {
    Empty,
    Text(String),
    Integer(u64),
    Number(Decimal),
}

impl ExportCell {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s)
        }
    }

    pub fn money(m: Money) -> Self {
        Self::Number(m.to_rate_scale().amount())
    }

    /// Rendering used by text-based writers and tests
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Number(d) => d.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub kind: RowKind,
    pub cells: Vec<ExportCell>,
    /// Height hint in points
    pub height: f64,
}

/// A single-row merge across a column span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeRange {
    /// Absolute row index in the sheet
    pub row: u32,
    pub first_col: u16,
    pub last_col: u16,
}

/// A format-neutral single-sheet spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDocument {
    pub sheet_name: String,
    /// Tab colour as 0xRRGGBB
    pub tab_color: Option<u32>,
    /// Zoom percentage
    pub zoom: Option<u16>,
    /// Header row fill as 0xRRGGBB
    pub header_fill: Option<u32>,
    pub columns: Vec<ExportColumn>,
    pub rows: Vec<ExportRow>,
    pub merges: Vec<MergeRange>,
    pub grand_total: Money,
}

/// Column titles of the consolidated estimate sheet
pub fn manhour_titles(currency: &str) -> [String; COLUMN_COUNT as usize] {
    [
        "Item No.".to_string(),
        "Description".to_string(),
        "NosXHrsXDays".to_string(),
        "Unit".to_string(),
        "Required QTY".to_string(),
        format!("Unit Rate ({})", currency),
        format!("Amount ({})", currency),
    ]
}

/// Shape the ledger into a document.
///
/// Row 0 is the header. Each group contributes a heading row (merged across
/// all columns) followed by its data rows, in ledger order. An empty ledger
/// gives a header-only document.
pub fn build_export_document(ledger: &ConsolidationLedger, currency: &str) -> ExportDocument {
    let titles = manhour_titles(currency);
    let columns = titles
        .iter()
        .zip(MANHOURS_WIDTHS)
        .map(|(title, width)| ExportColumn {
            title: title.clone(),
            width,
        })
        .collect();

    let mut rows = vec![ExportRow {
        kind: RowKind::Header,
        cells: titles.into_iter().map(ExportCell::Text).collect(),
        height: HEADER_HEIGHT,
    }];
    let mut merges = Vec::with_capacity(ledger.len());

    for entry in ledger.entries() {
        merges.push(MergeRange {
            row: rows.len() as u32,
            first_col: 0,
            last_col: COLUMN_COUNT - 1,
        });
        rows.push(ExportRow {
            kind: RowKind::GroupHeading,
            cells: vec![ExportCell::text(entry.group_name())],
            height: HEADING_HEIGHT,
        });
        rows.extend(entry.rows().iter().map(data_row));
    }

    ExportDocument {
        sheet_name: MANHOURS_SHEET.to_string(),
        tab_color: None,
        zoom: None,
        header_fill: None,
        columns,
        rows,
        merges,
        grand_total: ledger.grand_total(),
    }
}

// Required QTY is persons × 10 × days on every row, whatever the unit.
fn data_row(row: &EstimateRow) -> ExportRow {
    ExportRow {
        kind: RowKind::Data,
        cells: vec![
            ExportCell::text(row.item_no.as_str()),
            ExportCell::text(row.description.as_str()),
            ExportCell::Text(row.nos_hrs_days()),
            ExportCell::text(row.unit.as_str()),
            ExportCell::Integer(row.required_qty()),
            ExportCell::money(row.unit_rate),
            ExportCell::money(row.total_value),
        ],
        height: DATA_HEIGHT,
    }
}
