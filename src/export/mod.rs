//! Export module for manhours-cli
//!
//! Layout and serialization of estimates and extracted tables:
//! - Layout: format-neutral documents for the consolidated estimate and MTO
//! - XLSX: spreadsheet writer for those documents
//! - CSV, JSON, YAML: flat and structured dumps of the ledger

pub mod csv;
pub mod json;
pub mod layout;
pub mod mto;
pub mod xlsx;
pub mod yaml;

pub use self::csv::export_ledger_csv;
pub use json::{export_ledger_json, import_from_json, LedgerExport, EXPORT_SCHEMA_VERSION};
pub use layout::{
    build_export_document, ExportCell, ExportColumn, ExportDocument, ExportRow, MergeRange,
    RowKind, SectionStyle,
};
pub use mto::build_mto_document;
pub use xlsx::{save_xlsx, xlsx_bytes};
pub use yaml::{export_ledger_yaml, import_from_yaml};

use std::fmt;
use std::str::FromStr;

/// Output formats for the consolidated estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
    Yaml,
}

impl ExportFormat {
    /// File extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Guess the format from a file name's extension
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(format!(
                "Unknown export format '{}' (expected xlsx, csv, json or yaml)",
                other
            )),
        }
    }
}
