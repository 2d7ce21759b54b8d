use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_CONFIG_PATH: &str = "COVERAGE_INTEL_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Filesystem layout of the policy corpus and pipeline artifacts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorpusPaths {
    /// Directory holding the raw policy documents (.txt / .pdf)
    pub policy_dir: PathBuf,
    /// JSON file the chunker writes and the indexer reads
    pub chunks_file: PathBuf,
    /// Directory holding the vector index and its clause metadata
    pub index_dir: PathBuf,
    /// Directory holding generated synthetic claim files
    pub claims_dir: PathBuf,
    /// Directory holding the tabular claim CSVs used for generation
    pub claims_tabular_dir: PathBuf,
    /// Directory evaluation reports are written into
    pub results_dir: PathBuf,
}

impl Default for CorpusPaths {
    fn default() -> Self {
        Self {
            policy_dir: PathBuf::from("data/raw/policies"),
            chunks_file: PathBuf::from("data/processed/policy_chunks/policy_chunks.json"),
            index_dir: PathBuf::from("data/processed/vector_index"),
            claims_dir: PathBuf::from("data/processed/synthetic_claims"),
            claims_tabular_dir: PathBuf::from("data/raw/claims_tabular"),
            results_dir: PathBuf::from("results"),
        }
    }
}

/// Tunable pipeline parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineTuning {
    /// Clauses retrieved per claim
    pub top_k: usize,
    /// Chunk length in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks, in characters
    pub chunk_overlap: usize,
    /// Maximum claims evaluated per run
    pub batch_limit: usize,
}

impl Default for PipelineTuning {
    fn default() -> Self {
        Self {
            top_k: 5,
            chunk_size: 800,
            chunk_overlap: 150,
            batch_limit: 30,
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub paths: CorpusPaths,
    #[serde(default)]
    pub tuning: PipelineTuning,
}

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub paths: CorpusPaths,
    pub tuning: PipelineTuning,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        Self {
            paths: file.paths,
            tuning: file.tuning,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Handle empty file
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_matches_pipeline_constants() {
        let tuning = PipelineTuning::default();
        assert_eq!(tuning.top_k, 5);
        assert_eq!(tuning.chunk_size, 800);
        assert_eq!(tuning.chunk_overlap, 150);
        assert_eq!(tuning.batch_limit, 30);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults_for_missing_keys() {
        let yaml = "tuning:\n  top_k: 3\n";
        let file: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.tuning.top_k, 3);
        assert_eq!(file.tuning.chunk_size, 800);
        assert_eq!(file.paths.results_dir, PathBuf::from("results"));
    }
}
