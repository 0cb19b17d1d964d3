//! Where catalogs live on disk.

use factoscope_api::models::ProjectId;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

pub const STATE_DIR_ENV: &str = "FACTOSCOPE_STATE_DIR";
pub const DEFAULT_STATE_DIR: &str = ".factoscope/state";
pub const SNAPSHOT_FILE_NAME: &str = "factory_methods.bin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Engine-private root under which every project gets its own directory.
    pub state_dir: PathBuf,
}

impl CatalogConfig {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    /// `FACTOSCOPE_STATE_DIR` if set, `~/.factoscope/state` otherwise.
    pub fn from_env() -> Self {
        if let Ok(env_dir) = std::env::var(STATE_DIR_ENV) {
            if !env_dir.is_empty() {
                return Self::new(env_dir);
            }
        }
        Self::new(home_dir().join(DEFAULT_STATE_DIR))
    }

    /// Directory owned by one project.
    pub fn project_dir(&self, project: &ProjectId) -> PathBuf {
        let hash = xxh3_64(project.as_str().as_bytes());
        self.state_dir.join(format!("{:016x}", hash))
    }

    /// Snapshot file of one project.
    pub fn snapshot_path(&self, project: &ProjectId) -> PathBuf {
        self.project_dir(project).join(SNAPSHOT_FILE_NAME)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

pub(crate) fn home_dir() -> PathBuf {
    dirs::home_dir()
        .or_else(|| std::env::var("HOME").ok().map(PathBuf::from))
        .unwrap_or_else(|| Path::new(".").to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_dirs_are_stable_and_distinct() {
        let config = CatalogConfig::new("/tmp/state");
        let a = config.project_dir(&ProjectId::from("/ws/a"));
        let b = config.project_dir(&ProjectId::from("/ws/b"));
        assert_ne!(a, b);
        assert_eq!(a, config.project_dir(&ProjectId::from("/ws/a")));
        assert!(a.starts_with("/tmp/state"));
        assert_eq!(
            config.snapshot_path(&ProjectId::from("/ws/a")),
            a.join(SNAPSHOT_FILE_NAME)
        );
    }
}
