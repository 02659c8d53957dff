//! Spreadsheet layout for an extracted MTO table

use rust_decimal::Decimal;
use std::str::FromStr;

use super::layout::{
    ExportCell, ExportColumn, ExportDocument, ExportRow, MergeRange, RowKind, SectionStyle,
    COLUMN_COUNT,
};
use crate::error::{ManhoursError, ManhoursResult};
use crate::extract::Extraction;
use crate::models::Money;

pub const MTO_SHEET: &str = "MTO Table";

const MTO_WIDTHS: [f64; COLUMN_COUNT as usize] = [12.0, 60.0, 14.0, 10.0, 16.0, 18.0, 18.0];
const TAB_COLOR: u32 = 0x92D050;
const ZOOM: u16 = 115;
const TITLE_HEIGHT: f64 = 28.0;
const HEADER_HEIGHT: f64 = 25.0;
const SECTION_HEIGHT: f64 = 20.0;
const MIN_DATA_HEIGHT: f64 = 20.0;
const LINE_HEIGHT: f64 = 15.0;
/// Description column width × 1.5
const CHARS_PER_LINE: usize = 90;

/// Header fill of the MTO sheet
pub const HEADER_FILL: u32 = 0xD9D2E9;

const SECTIONS: [(&str, SectionStyle); 3] = [
    (
        "PROCUREMENT",
        SectionStyle {
            fill: Some(0xFFFF00),
            italic: false,
        },
    ),
    (
        "MATERIAL UNIT RATES",
        SectionStyle {
            fill: None,
            italic: false,
        },
    ),
    (
        "PIPING",
        SectionStyle {
            fill: Some(0xEAD1C2),
            italic: true,
        },
    ),
];

fn titles(currency: &str) -> [String; COLUMN_COUNT as usize] {
    [
        "Item No.".to_string(),
        "Description".to_string(),
        "SIZE".to_string(),
        "Unit".to_string(),
        "Required QTY".to_string(),
        format!("Unit Rate ({})", currency),
        format!("Amount ({})", currency),
    ]
}

/// Height for a data row whose description has `chars` characters
pub fn data_row_height(chars: usize) -> f64 {
    let lines = chars.div_ceil(CHARS_PER_LINE).max(1);
    (lines as f64 * LINE_HEIGHT).max(MIN_DATA_HEIGHT)
}

/// Shape an extraction into the proposal sheet. An empty table is refused.
pub fn build_mto_document(extraction: &Extraction, currency: &str) -> ManhoursResult<ExportDocument> {
    if extraction.rows.is_empty() {
        return Err(ManhoursError::Validation(
            "No extracted rows to export".to_string(),
        ));
    }

    let titles = titles(currency);
    let columns = titles
        .iter()
        .zip(MTO_WIDTHS)
        .map(|(title, width)| ExportColumn {
            title: title.clone(),
            width,
        })
        .collect();

    let mut rows = Vec::with_capacity(extraction.rows.len() + 5);
    rows.push(ExportRow {
        kind: RowKind::Title,
        cells: vec![ExportCell::Text(format!(
            "COMMERCIAL PROPOSAL FOR MOC# {}",
            extraction.moc
        ))],
        height: TITLE_HEIGHT,
    });
    rows.push(ExportRow {
        kind: RowKind::Header,
        cells: titles.into_iter().map(ExportCell::Text).collect(),
        height: HEADER_HEIGHT,
    });
    for (label, style) in SECTIONS {
        rows.push(ExportRow {
            kind: RowKind::Section(style),
            cells: vec![ExportCell::Empty, ExportCell::text(label)],
            height: SECTION_HEIGHT,
        });
    }

    for row in &extraction.rows {
        let description = collapse_line_breaks(&row.description);
        let height = data_row_height(description.chars().count());
        rows.push(ExportRow {
            kind: RowKind::Data,
            cells: vec![
                ExportCell::Empty,
                ExportCell::text(description),
                ExportCell::text(row.size.trim()),
                ExportCell::text(row.uom.trim()),
                quantity_cell(&row.qty),
                ExportCell::Empty,
                ExportCell::Empty,
            ],
            height,
        });
    }

    Ok(ExportDocument {
        sheet_name: MTO_SHEET.to_string(),
        tab_color: Some(TAB_COLOR),
        zoom: Some(ZOOM),
        header_fill: Some(HEADER_FILL),
        columns,
        rows,
        merges: vec![MergeRange {
            row: 0,
            first_col: 0,
            last_col: COLUMN_COUNT - 1,
        }],
        grand_total: Money::zero(),
    })
}

fn collapse_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;
    for ch in text.chars() {
        if ch == '\r' || ch == '\n' {
            if !in_break {
                out.push(' ');
            }
            in_break = true;
        } else {
            out.push(ch);
            in_break = false;
        }
    }
    out
}

// Numeric quantities are written as numbers so the sheet can total them.
fn quantity_cell(qty: &str) -> ExportCell {
    let qty = qty.trim();
    match Decimal::from_str(qty) {
        Ok(n) => ExportCell::Number(n),
        Err(_) => ExportCell::text(qty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::MtoRow;

    fn extraction(rows: Vec<MtoRow>) -> Extraction {
        Extraction {
            moc: "4471".into(),
            rows,
        }
    }

    fn mto_row(description: &str, qty: &str) -> MtoRow {
        MtoRow {
            sl_no: "1".into(),
            description: description.into(),
            qty: qty.into(),
            uom: "M".into(),
            ..MtoRow::default()
        }
    }

    #[test]
    fn test_empty_extraction_is_refused() {
        let err = build_mto_document(&extraction(vec![]), "SAR").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_fixed_rows() {
        let doc = build_mto_document(&extraction(vec![mto_row("Pipe", "3000")]), "SAR").unwrap();
        assert_eq!(doc.sheet_name, "MTO Table");
        assert_eq!(doc.tab_color, Some(0x92D050));
        assert_eq!(doc.zoom, Some(115));
        assert_eq!(doc.rows.len(), 6);

        assert_eq!(doc.rows[0].cells[0].display(), "COMMERCIAL PROPOSAL FOR MOC# 4471");
        assert_eq!(doc.rows[0].height, 28.0);
        assert_eq!(doc.merges, vec![MergeRange { row: 0, first_col: 0, last_col: 6 }]);

        assert_eq!(doc.rows[1].kind, RowKind::Header);
        assert_eq!(doc.rows[1].cells[2].display(), "SIZE");
        assert_eq!(doc.rows[1].height, 25.0);

        let labels: Vec<String> = doc.rows[2..5].iter().map(|r| r.cells[1].display()).collect();
        assert_eq!(labels, vec!["PROCUREMENT", "MATERIAL UNIT RATES", "PIPING"]);
        assert!(matches!(
            doc.rows[4].kind,
            RowKind::Section(SectionStyle { italic: true, fill: Some(0xEAD1C2) })
        ));

        let widths: Vec<f64> = doc.columns.iter().map(|c| c.width).collect();
        assert_eq!(widths, vec![12.0, 60.0, 14.0, 10.0, 16.0, 18.0, 18.0]);
    }

    #[test]
    fn test_data_rows() {
        let doc = build_mto_document(
            &extraction(vec![mto_row("Pipe\r\nCS\nSeamless", "3000"), mto_row("Gasket", "as req.")]),
            "SAR",
        )
        .unwrap();

        let pipe = &doc.rows[5];
        assert_eq!(pipe.cells[0], ExportCell::Empty);
        assert_eq!(pipe.cells[1].display(), "Pipe CS Seamless");
        assert_eq!(pipe.cells[3].display(), "M");
        assert_eq!(pipe.cells[4], ExportCell::Number(Decimal::from(3000)));
        assert_eq!(pipe.cells[5], ExportCell::Empty);
        assert_eq!(pipe.height, 20.0);

        assert_eq!(doc.rows[6].cells[4].display(), "as req.");
    }

    #[test]
    fn test_data_row_height() {
        assert_eq!(data_row_height(0), 20.0);
        assert_eq!(data_row_height(90), 20.0);
        assert_eq!(data_row_height(91), 30.0);
        assert_eq!(data_row_height(300), 60.0);
    }
}
