//! PDF text extraction, behind the `pdf` feature

use std::path::Path;

use super::IngestError;

/// Extract the full plain text of a PDF policy document
pub fn extract_pdf_text(path: &Path) -> Result<String, IngestError> {
    pdf_extract::extract_text(path).map_err(|e| IngestError::Pdf {
        file: path.display().to_string(),
        message: e.to_string(),
    })
}
