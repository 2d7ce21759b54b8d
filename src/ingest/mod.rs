//! Policy corpus ingestion: loads raw policy documents, normalizes their
//! text and splits them into overlapping clause chunks ready for indexing.

pub mod chunker;
#[cfg(feature = "pdf")]
pub mod pdf;

use std::fs;
use std::path::Path;

use regex::Regex;
use thiserror::Error;

use crate::model::PolicyClause;

/// Error type for corpus ingestion
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "pdf")]
    #[error("Failed to extract text from {file}: {message}")]
    Pdf { file: String, message: String },

    #[error("Chunk serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Chunk overlap {overlap} must be smaller than chunk size {size}")]
    ChunkOverlap { size: usize, overlap: usize },
}

/// A raw policy document before chunking
#[derive(Debug, Clone)]
pub struct PolicyDocument {
    pub file_name: String,
    pub text: String,
}

/// Collapse all whitespace runs to single spaces and trim the ends
pub fn clean_text(text: &str) -> String {
    let whitespace_regex = Regex::new(r"\s+").unwrap();
    whitespace_regex.replace_all(text, " ").trim().to_string()
}

/// Load every readable policy document from a directory, sorted by file name.
///
/// Unreadable or empty files are skipped with a warning rather than failing
/// the whole corpus. PDF support requires the `pdf` feature; without it,
/// `.pdf` files are skipped like any other unsupported extension.
pub fn load_policy_documents(policy_dir: &Path) -> Result<Vec<PolicyDocument>, IngestError> {
    let mut paths: Vec<_> = fs::read_dir(policy_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        let file_name = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let text = match extension.as_deref() {
            Some("txt") => match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(file = %file_name, error = %e, "Failed to read policy file, skipping");
                    continue;
                }
            },
            #[cfg(feature = "pdf")]
            Some("pdf") => match pdf::extract_pdf_text(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(file = %file_name, error = %e, "Failed to extract policy PDF, skipping");
                    continue;
                }
            },
            _ => {
                tracing::debug!(file = %file_name, "Unsupported policy file type, skipping");
                continue;
            }
        };

        if text.trim().is_empty() {
            tracing::warn!(file = %file_name, "Policy file has no extractable text, skipping");
            continue;
        }

        documents.push(PolicyDocument { file_name, text });
    }

    tracing::info!(documents = documents.len(), dir = %policy_dir.display(), "Loaded policy corpus");
    Ok(documents)
}

/// Chunk a set of policy documents into clauses.
///
/// Chunk ids restart at zero for each source file.
pub fn chunk_documents(
    documents: &[PolicyDocument],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<PolicyClause>, IngestError> {
    if chunk_overlap >= chunk_size {
        return Err(IngestError::ChunkOverlap {
            size: chunk_size,
            overlap: chunk_overlap,
        });
    }

    let mut clauses = Vec::new();
    for document in documents {
        let cleaned = clean_text(&document.text);
        let chunks = chunker::chunk_text(&cleaned, chunk_size, chunk_overlap);
        let count = chunks.len();

        for (idx, text) in chunks.into_iter().enumerate() {
            clauses.push(PolicyClause {
                source_file: document.file_name.clone(),
                chunk_id: idx as u32,
                text,
            });
        }

        tracing::info!(file = %document.file_name, chunks = count, "Chunked policy document");
    }

    Ok(clauses)
}

/// Persist chunked clauses as pretty-printed JSON
pub fn save_chunks(path: &Path, clauses: &[PolicyClause]) -> Result<(), IngestError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(clauses)?;
    fs::write(path, json)?;
    tracing::info!(clauses = clauses.len(), path = %path.display(), "Saved policy chunks");
    Ok(())
}

/// Load previously chunked clauses
pub fn load_chunks(path: &Path) -> Result<Vec<PolicyClause>, IngestError> {
    let json = fs::read_to_string(path)?;
    let clauses = serde_json::from_str(&json)?;
    Ok(clauses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        let raw = "  Section 4.2\n\n  Cataract   surgery\tis covered.  ";
        assert_eq!(clean_text(raw), "Section 4.2 Cataract surgery is covered.");
    }

    #[test]
    fn test_chunk_documents_assigns_per_file_ids() {
        let documents = vec![
            PolicyDocument {
                file_name: "policy_a.txt".to_string(),
                text: "a".repeat(30),
            },
            PolicyDocument {
                file_name: "policy_b.txt".to_string(),
                text: "b".repeat(30),
            },
        ];

        let clauses = chunk_documents(&documents, 20, 5).unwrap();
        let ids_a: Vec<u32> = clauses
            .iter()
            .filter(|c| c.source_file == "policy_a.txt")
            .map(|c| c.chunk_id)
            .collect();
        let ids_b: Vec<u32> = clauses
            .iter()
            .filter(|c| c.source_file == "policy_b.txt")
            .map(|c| c.chunk_id)
            .collect();

        assert_eq!(ids_a, vec![0, 1]);
        assert_eq!(ids_b, vec![0, 1]);
    }

    #[test]
    fn test_chunk_documents_rejects_overlap_at_least_chunk_size() {
        let documents = vec![PolicyDocument {
            file_name: "policy.txt".to_string(),
            text: "some policy text".to_string(),
        }];

        let err = chunk_documents(&documents, 100, 100).unwrap_err();
        assert!(matches!(
            err,
            IngestError::ChunkOverlap {
                size: 100,
                overlap: 100
            }
        ));
    }

    #[test]
    fn test_load_policy_documents_skips_empty_and_unsupported_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_policy.txt"), "Hospitalization is covered.").unwrap();
        fs::write(dir.path().join("a_policy.txt"), "Dental care is excluded.").unwrap();
        fs::write(dir.path().join("empty.txt"), "   \n").unwrap();
        fs::write(dir.path().join("notes.md"), "not a policy").unwrap();

        let documents = load_policy_documents(dir.path()).unwrap();
        let names: Vec<&str> = documents.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["a_policy.txt", "b_policy.txt"]);
    }

    #[test]
    fn test_chunks_round_trip_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunks/policy_chunks.json");
        let clauses = vec![PolicyClause {
            source_file: "policy.txt".to_string(),
            chunk_id: 0,
            text: "Cataract surgery is covered after a waiting period.".to_string(),
        }];

        save_chunks(&path, &clauses).unwrap();
        let loaded = load_chunks(&path).unwrap();
        assert_eq!(loaded, clauses);
    }
}
