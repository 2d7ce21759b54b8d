//! Claim document store: loads synthetic claim files for evaluation runs
//! and pulls the insurer name out of the claim text for reporting.

pub mod synthetic;

use std::fs;
use std::path::Path;

use thiserror::Error;

/// File name prefix shared by all generated claim documents
pub const CLAIM_FILE_PREFIX: &str = "synthetic_claim_";

/// Labels an insurer line may start with, checked in order
const INSURER_PREFIXES: &[&str] = &["Insurer Name:", "Insurer:"];

/// Error type for the claim store
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClaimStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Claims directory not found: {0}")]
    MissingDir(String),
}

/// One claim awaiting adjudication
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimDocument {
    /// File stem, e.g. `synthetic_claim_0007`
    pub claim_id: String,
    pub text: String,
    /// Insurer named in the claim text, when one could be found
    pub insurer: Option<String>,
}

/// Pull the insurer name from a claim's text, scanning line by line.
///
/// Matching is ASCII case-insensitive; a labelled but empty line counts
/// as no insurer.
pub fn extract_insurer(text: &str) -> Option<String> {
    for line in text.lines() {
        let line = line.trim();
        for prefix in INSURER_PREFIXES {
            if let Some(head) = line.get(..prefix.len())
                && head.eq_ignore_ascii_case(prefix)
            {
                let value = line[prefix.len()..].trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Load up to `limit` claim documents from `claims_dir`, sorted by file name.
///
/// Only `synthetic_claim_*.txt` files are considered; unreadable or empty
/// files are skipped with a warning.
pub fn load_claim_documents(
    claims_dir: &Path,
    limit: usize,
) -> Result<Vec<ClaimDocument>, ClaimStoreError> {
    if !claims_dir.is_dir() {
        return Err(ClaimStoreError::MissingDir(
            claims_dir.display().to_string(),
        ));
    }

    let mut paths: Vec<_> = fs::read_dir(claims_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| {
                        name.starts_with(CLAIM_FILE_PREFIX) && name.ends_with(".txt")
                    })
        })
        .collect();
    paths.sort();
    paths.truncate(limit);

    let mut documents = Vec::new();
    for path in paths {
        let claim_id = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(claim_id = %claim_id, error = %e, "Failed to read claim file, skipping");
                continue;
            }
        };

        if text.trim().is_empty() {
            tracing::warn!(claim_id = %claim_id, "Claim file is empty, skipping");
            continue;
        }

        let insurer = extract_insurer(&text);
        documents.push(ClaimDocument {
            claim_id,
            text,
            insurer,
        });
    }

    tracing::info!(claims = documents.len(), dir = %claims_dir.display(), "Loaded claim documents");
    Ok(documents)
}
