//! Resumable progress of an embedding run.

use super::runner::EmbeddingOutcome;
use crate::errors::IngestError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use xxhash_rust::xxh64::Xxh64;

/// Outcomes for the first `completed` inputs of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub model_id: String,
    pub total: usize,
    /// xxh64 over the input texts, hex encoded.
    pub input_digest: String,
    pub completed: usize,
    pub outcomes: Vec<EmbeddingOutcome>,
    pub updated_at: DateTime<Utc>,
}

impl Checkpoint {
    pub fn new(model_id: &str, texts: &[String]) -> Self {
        Self {
            model_id: model_id.to_string(),
            total: texts.len(),
            input_digest: input_digest(texts),
            completed: 0,
            outcomes: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Whether this checkpoint was written for the same model and inputs.
    pub fn matches(&self, model_id: &str, texts: &[String]) -> bool {
        self.model_id == model_id
            && self.total == texts.len()
            && self.input_digest == input_digest(texts)
            && self.completed == self.outcomes.len()
            && self.completed <= self.total
    }

    /// Record outcomes for the next inputs.
    pub fn extend(&mut self, outcomes: impl IntoIterator<Item = EmbeddingOutcome>) {
        self.outcomes.extend(outcomes);
        self.completed = self.outcomes.len();
        self.updated_at = Utc::now();
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }

    /// Load a checkpoint; `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, IngestError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(IngestError::CheckpointIo {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| IngestError::CheckpointFormat {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Write atomically (temp file, then rename).
    pub fn save(&self, path: &Path) -> Result<(), IngestError> {
        let io_err = |source| IngestError::CheckpointIo {
            path: path.to_path_buf(),
            source,
        };
        let json =
            serde_json::to_string(self).map_err(|source| IngestError::CheckpointFormat {
                path: path.to_path_buf(),
                source,
            })?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }

    /// Delete a checkpoint file if present.
    pub fn remove(path: &Path) -> Result<(), IngestError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(IngestError::CheckpointIo {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Order-sensitive digest of the input texts.
pub fn input_digest(texts: &[String]) -> String {
    let mut hasher = Xxh64::new(0);
    for text in texts {
        hasher.update(text.as_bytes());
        hasher.update(&[0xff]);
    }
    format!("{:016x}", hasher.digest())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn texts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.checkpoint.json");
        let inputs = texts(&["Welder", "Nurse"]);

        let mut checkpoint = Checkpoint::new("m", &inputs);
        checkpoint.extend([EmbeddingOutcome::Embedded {
            embedding: vec![0.5, 0.5],
            attempts: 1,
        }]);
        checkpoint.save(&path).unwrap();

        let loaded = Checkpoint::load(&path).unwrap().unwrap();
        assert_eq!(loaded, checkpoint);
        assert!(loaded.matches("m", &inputs));
        assert!(!loaded.is_complete());
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(Checkpoint::load(&dir.path().join("none.json")).unwrap().is_none());
        Checkpoint::remove(&dir.path().join("none.json")).unwrap();
    }

    #[test]
    fn test_garbage_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{").unwrap();
        assert!(matches!(
            Checkpoint::load(&path),
            Err(IngestError::CheckpointFormat { .. })
        ));
    }

    #[test]
    fn test_mismatch_detection() {
        let inputs = texts(&["a", "b"]);
        let checkpoint = Checkpoint::new("m", &inputs);
        assert!(checkpoint.matches("m", &inputs));
        assert!(!checkpoint.matches("other", &inputs));
        assert!(!checkpoint.matches("m", &texts(&["a", "c"])));
        assert!(!checkpoint.matches("m", &texts(&["b", "a"])));
    }

    #[test]
    fn test_digest_separates_fields() {
        assert_ne!(input_digest(&texts(&["ab", "c"])), input_digest(&texts(&["a", "bc"])));
    }
}
