//! JSON-file persistence.
//!
//! Each collection is one file, `<data_dir>/<name>`, holding a JSON array.
//! Reads are forgiving: a missing or unreadable file is an empty
//! collection. Writes replace the whole file.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Error;

/// A record: one JSON object in a collection.
pub type Record = Value;

/// Collections stored as pretty-printed JSON files in one directory.
#[derive(Clone, Debug)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path { &self.dir }

    /// All records of `name`, in file order.
    ///
    /// Never fails: a missing file, an unreadable file, or content that is
    /// not a JSON array all read as an empty collection.
    pub async fn read_collection(&self, name: &str) -> Vec<Record> {
        let path = self.dir.join(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "collection not readable; treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "collection is not a JSON array; treating as empty");
                Vec::new()
            }
        }
    }

    /// Replaces `name` with `records`, indented by two spaces.
    pub async fn write_collection(&self, name: &str, records: &[Record]) -> Result<(), Error> {
        let text = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(self.dir.join(name), text).await?;
        Ok(())
    }
}
