use serde::{Deserialize, Serialize};

// A contiguous span of policy text produced by the chunker.
// - source_file: file the text came from, e.g. "hdfc_ergo_policy.pdf"
// - chunk_id: zero-based position of the chunk within that file
// Identified by (source_file, chunk_id); the text never changes once the
// corpus is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyClause {
    pub source_file: String,
    pub chunk_id: u32,
    pub text: String,
}

/// A clause returned for one query, paired with its squared-L2 distance
/// to the query vector. Lower distance means a closer match; the order of
/// a result list is the retrieval rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedClause {
    pub clause: PolicyClause,
    pub distance: f32,
}
