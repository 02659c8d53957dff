//! PDF text extraction

use crate::error::{ManhoursError, ManhoursResult};

/// Leading bytes of every PDF file
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Turns PDF bytes into plain text
pub trait PdfTextSource {
    fn extract_text(&self, bytes: &[u8]) -> ManhoursResult<String>;
}

/// Reject input that does not carry the PDF signature
pub fn ensure_pdf(bytes: &[u8]) -> ManhoursResult<()> {
    if bytes.starts_with(PDF_SIGNATURE) {
        Ok(())
    } else {
        Err(ManhoursError::extraction(
            "Invalid file type. Please upload a PDF file.",
        ))
    }
}

/// Text extraction backed by `lopdf`
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfTextSource;

impl PdfTextSource for LopdfTextSource {
    fn extract_text(&self, bytes: &[u8]) -> ManhoursResult<String> {
        ensure_pdf(bytes)?;

        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| ManhoursError::extraction(format!("Failed to read PDF: {}", e)))?;

        let pages: Vec<u32> = document.get_pages().keys().copied().collect();
        if pages.is_empty() {
            return Err(ManhoursError::extraction("PDF has no pages"));
        }
        tracing::debug!(pages = pages.len(), "extracting PDF text");

        document
            .extract_text(&pages)
            .map_err(|e| ManhoursError::extraction(format!("Failed to extract PDF text: {}", e)))
    }
}
