//! On-disk snapshot of one project's signature set.
//!
//! Every mutation rewrites the whole snapshot: MessagePack via `rmp-serde`,
//! compressed with `zstd`, written to a temporary sibling and renamed into
//! place.

use crate::error::{FactoscopeError, Result};
use factoscope_api::models::FactoryMethodSignature;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Bumped whenever the encoded layout changes. Older snapshots are dropped.
pub const SNAPSHOT_VERSION: u32 = 1;

const COMPRESSION_LEVEL: i32 = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub version: u32,
    pub project: String,
    pub signatures: Vec<FactoryMethodSignature>,
}

impl CatalogSnapshot {
    pub fn new(project: impl Into<String>, signatures: Vec<FactoryMethodSignature>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            project: project.into(),
            signatures,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let bytes = rmp_serde::to_vec(self)?;
        let compressed = zstd::encode_all(&bytes[..], COMPRESSION_LEVEL)
            .map_err(|e| FactoscopeError::Encode(format!("zstd: {}", e)))?;
        Ok(compressed)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let decompressed = zstd::decode_all(bytes)
            .map_err(|e| FactoscopeError::Decode(format!("zstd: {}", e)))?;
        let snapshot: CatalogSnapshot = rmp_serde::from_slice(&decompressed)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(FactoscopeError::SnapshotVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

/// Reads and writes the snapshot file of one project.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// `Ok(None)` when there is no snapshot yet.
    pub fn load(&self) -> Result<Option<CatalogSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&self.path)?;
        CatalogSnapshot::decode(&bytes).map(Some)
    }

    pub fn save(&self, snapshot: &CatalogSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = snapshot.encode()?;

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, bytes)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    /// Delete the snapshot file. Missing files are fine.
    pub fn remove(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the whole directory holding the snapshot.
    pub fn remove_dir(&self) -> Result<()> {
        let Some(dir) = self.path.parent() else {
            return self.remove();
        };
        match std::fs::remove_dir_all(dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
