//! MTO (material take-off) extraction from PDF documents
//!
//! A PDF's text is handed to a language model which returns the table rows as
//! JSON. The PDF reader and the model are both injected, so the pipeline runs
//! against test doubles as easily as against `lopdf` and a live endpoint.

pub mod llm;
pub mod parse;
pub mod pdf;

pub use llm::{LanguageModel, OpenAiClient};
pub use parse::{build_prompt, find_moc_number, parse_model_output};
pub use pdf::{ensure_pdf, LopdfTextSource, PdfTextSource};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ManhoursResult;

/// One row of an extracted table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtoRow {
    #[serde(rename = "Sl No", default, deserialize_with = "lenient_text")]
    pub sl_no: String,
    #[serde(rename = "Item Description", default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(rename = "SIZE", default, deserialize_with = "lenient_text")]
    pub size: String,
    #[serde(rename = "Qty", default, deserialize_with = "lenient_text")]
    pub qty: String,
    #[serde(rename = "UOM", default, deserialize_with = "lenient_text")]
    pub uom: String,
    #[serde(rename = "Remarks", default, deserialize_with = "lenient_text")]
    pub remarks: String,
}

// Models return numbers and nulls as often as strings.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Result of one extraction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// MOC reference found in the document text, empty when absent
    pub moc: String,
    #[serde(rename = "table")]
    pub rows: Vec<MtoRow>,
}

/// PDF-to-table pipeline
pub struct MtoExtractor<P, L> {
    pdf: P,
    model: L,
}

impl<P: PdfTextSource, L: LanguageModel> MtoExtractor<P, L> {
    pub fn new(pdf: P, model: L) -> Self {
        Self { pdf, model }
    }

    /// Extract the MOC number and table rows from PDF bytes
    pub fn extract(&self, bytes: &[u8]) -> ManhoursResult<Extraction> {
        ensure_pdf(bytes)?;
        let text = self.pdf.extract_text(bytes)?;
        let moc = find_moc_number(&text)?;
        tracing::debug!(chars = text.len(), moc = %moc, "PDF text extracted");

        let completion = self.model.complete(&build_prompt(&text))?;
        let rows = parse_model_output(&completion)?;
        tracing::info!(rows = rows.len(), "MTO table extracted");

        Ok(Extraction { moc, rows })
    }
}
