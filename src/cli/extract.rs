//! MTO extraction CLI commands

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::display::format_extraction;
use crate::error::ManhoursResult;
use crate::export::{build_mto_document, save_xlsx};
use crate::extract::{ensure_pdf, LopdfTextSource, MtoExtractor, OpenAiClient};

/// Extract the MTO table from a PDF, print it and write the workbook
pub fn handle_extract(
    settings: &Settings,
    pdf: &Path,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
) -> ManhoursResult<()> {
    let bytes = std::fs::read(pdf)?;
    ensure_pdf(&bytes)?;

    let client = OpenAiClient::from_settings(&settings.llm)?;
    let extractor = MtoExtractor::new(LopdfTextSource, client);

    let extraction = match extractor.extract(&bytes) {
        Ok(extraction) => extraction,
        Err(err) => {
            if let Some(raw) = err.model_output() {
                eprintln!("Model output:\n{}", raw);
            }
            return Err(err);
        }
    };

    print!("{}", format_extraction(&extraction));

    if let Some(json_path) = json {
        let writer = BufWriter::new(File::create(&json_path)?);
        serde_json::to_writer_pretty(writer, &extraction)?;
        println!("Wrote rows to {}", json_path.display());
    }

    if extraction.rows.is_empty() {
        println!("Nothing to export.");
        return Ok(());
    }

    let path = output.unwrap_or_else(|| PathBuf::from(&settings.mto_export_file));
    let doc = build_mto_document(&extraction, &settings.currency_code)?;
    save_xlsx(&doc, &path)?;
    println!("Exported MTO table to {}", path.display());

    Ok(())
}

/// Report whether extraction can reach a language model
pub fn handle_extract_status(settings: &Settings) {
    let llm = &settings.llm;
    println!("Endpoint: {}", llm.endpoint);
    println!("Model:    {}", llm.model);
    if llm.api_key().is_some() {
        println!("API key:  configured ({})", llm.api_key_env);
    } else {
        println!("API key:  missing (set {})", llm.api_key_env);
    }
}
