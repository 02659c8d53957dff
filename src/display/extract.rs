//! Extracted MTO table display

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::extract::Extraction;

#[derive(Tabled)]
struct MtoLine {
    #[tabled(rename = "Sl No")]
    sl_no: String,
    #[tabled(rename = "Item Description")]
    description: String,
    #[tabled(rename = "SIZE")]
    size: String,
    #[tabled(rename = "Qty")]
    qty: String,
    #[tabled(rename = "UOM")]
    uom: String,
    #[tabled(rename = "Remarks")]
    remarks: String,
}

/// Format the MOC reference and extracted rows
pub fn format_extraction(extraction: &Extraction) -> String {
    let moc = if extraction.moc.is_empty() {
        "(not found)"
    } else {
        extraction.moc.as_str()
    };
    let mut output = format!("MOC#: {}\n", moc);

    if extraction.rows.is_empty() {
        output.push_str("No table rows were extracted.\n");
        return output;
    }

    let lines = extraction.rows.iter().map(|row| MtoLine {
        sl_no: row.sl_no.clone(),
        description: row.description.clone(),
        size: row.size.clone(),
        qty: row.qty.clone(),
        uom: row.uom.clone(),
        remarks: row.remarks.clone(),
    });
    output.push_str(&Table::new(lines).with(Style::psql()).to_string());
    output.push_str(&format!("\n{} rows\n", extraction.rows.len()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::MtoRow;

    #[test]
    fn test_format_extraction() {
        let extraction = Extraction {
            moc: "MOC-17".into(),
            rows: vec![MtoRow {
                sl_no: "1".into(),
                description: "Gate valve".into(),
                qty: "2".into(),
                uom: "EA".into(),
                ..MtoRow::default()
            }],
        };

        let output = format_extraction(&extraction);
        assert!(output.starts_with("MOC#: MOC-17"));
        assert!(output.contains("Gate valve"));
        assert!(output.contains("1 rows"));
    }

    #[test]
    fn test_missing_moc() {
        let output = format_extraction(&Extraction::default());
        assert!(output.contains("(not found)"));
        assert!(output.contains("No table rows"));
    }
}
