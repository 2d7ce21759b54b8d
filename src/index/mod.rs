//! Flat vector index over embedded policy clauses.
//!
//! Brute-force squared-L2 scan over an in-memory matrix. The policy corpus
//! is a few hundred clauses at most, so an exact scan gives perfect recall
//! with no tuning. The index persists as a CBOR file next to a JSON
//! metadata file holding the clauses in the same positional order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::PolicyClause;

pub const INDEX_FILE_VERSION_V1: &str = "policy_index_v1";

/// CBOR vector file inside the index directory
pub const INDEX_FILE: &str = "policy_clauses.index";
/// JSON clause metadata file inside the index directory
pub const METADATA_FILE: &str = "policy_metadata.json";

/// Error type for index persistence and lookup
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IndexError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode index: {0}")]
    Encode(String),

    #[error("Failed to decode index: {0}")]
    Decode(String),

    #[error("Unsupported index file version: {found} (expected {expected})")]
    Version {
        found: String,
        expected: &'static str,
    },

    #[error("Vector has dimension {found}, index expects {expected}")]
    Dimension { found: usize, expected: usize },

    #[error("Index holds {vectors} vectors but metadata lists {clauses} clauses")]
    Misaligned { vectors: usize, clauses: usize },

    #[error("Clause metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// On-disk layout of the vector file
#[derive(Debug, Serialize, Deserialize)]
struct IndexFileV1 {
    version: String,
    created_at_unix_secs: u64,
    model: String,
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

/// Exhaustive squared-L2 index.
///
/// Row `i` of the index corresponds to clause `i` in the metadata file;
/// that positional pairing is the only link between vectors and text.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    model: String,
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// Create an empty index for vectors of dimension `dim` produced by `model`
    pub fn new(model: impl Into<String>, dim: usize) -> Self {
        Self {
            model: model.into(),
            dim,
            vectors: Vec::new(),
        }
    }

    /// Embedding model that produced the stored vectors
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append a vector as the next row
    pub fn add(&mut self, vector: Vec<f32>) -> Result<(), IndexError> {
        if vector.len() != self.dim {
            return Err(IndexError::Dimension {
                found: vector.len(),
                expected: self.dim,
            });
        }
        self.vectors.push(vector);
        Ok(())
    }

    /// Return up to `k` row indices nearest to `query`, closest first,
    /// each paired with its squared-L2 distance.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, IndexError> {
        if query.len() != self.dim {
            return Err(IndexError::Dimension {
                found: query.len(),
                expected: self.dim,
            });
        }

        let mut hits: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(idx, vector)| (idx, squared_l2(query, vector)))
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits.truncate(k);
        Ok(hits)
    }

    /// Write the vectors as a versioned CBOR file
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        let file = IndexFileV1 {
            version: INDEX_FILE_VERSION_V1.to_string(),
            created_at_unix_secs: chrono::Utc::now().timestamp().max(0) as u64,
            model: self.model.clone(),
            dim: self.dim,
            vectors: self.vectors.clone(),
        };

        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&file, &mut bytes)
            .map_err(|e| IndexError::Encode(e.to_string()))?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a versioned CBOR vector file
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let bytes = fs::read(path)?;
        let file: IndexFileV1 = ciborium::de::from_reader(bytes.as_slice())
            .map_err(|e| IndexError::Decode(e.to_string()))?;

        if file.version != INDEX_FILE_VERSION_V1 {
            return Err(IndexError::Version {
                found: file.version,
                expected: INDEX_FILE_VERSION_V1,
            });
        }

        if let Some(vector) = file.vectors.iter().find(|v| v.len() != file.dim) {
            return Err(IndexError::Dimension {
                found: vector.len(),
                expected: file.dim,
            });
        }

        Ok(Self {
            model: file.model,
            dim: file.dim,
            vectors: file.vectors,
        })
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Persist an index and its clause metadata into `index_dir`.
///
/// Fails if vectors and clauses are not positionally aligned.
pub fn save_corpus(
    index_dir: &Path,
    index: &FlatIndex,
    clauses: &[PolicyClause],
) -> Result<(), IndexError> {
    if index.len() != clauses.len() {
        return Err(IndexError::Misaligned {
            vectors: index.len(),
            clauses: clauses.len(),
        });
    }

    fs::create_dir_all(index_dir)?;
    index.save(&index_dir.join(INDEX_FILE))?;

    let metadata = serde_json::to_string_pretty(clauses)?;
    fs::write(index_dir.join(METADATA_FILE), metadata)?;

    tracing::info!(
        vectors = index.len(),
        dim = index.dim(),
        dir = %index_dir.display(),
        "Saved vector index"
    );
    Ok(())
}

/// Load an index and its clause metadata from `index_dir`, validating
/// that the two files are still positionally aligned.
pub fn load_corpus(index_dir: &Path) -> Result<(FlatIndex, Vec<PolicyClause>), IndexError> {
    let index = FlatIndex::load(&index_dir.join(INDEX_FILE))?;

    let metadata = fs::read_to_string(index_dir.join(METADATA_FILE))?;
    let clauses: Vec<PolicyClause> = serde_json::from_str(&metadata)?;

    if index.len() != clauses.len() {
        return Err(IndexError::Misaligned {
            vectors: index.len(),
            clauses: clauses.len(),
        });
    }

    Ok((index, clauses))
}
