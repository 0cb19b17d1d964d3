use thiserror::Error;

#[derive(Error, Debug)]
pub enum FactoscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot encoding error: {0}")]
    Encode(String),
    #[error("Snapshot decoding error: {0}")]
    Decode(String),
    #[error("Snapshot version mismatch (found {found}, expected {expected})")]
    SnapshotVersion { found: u32, expected: u32 },
}

impl From<rmp_serde::encode::Error> for FactoscopeError {
    fn from(err: rmp_serde::encode::Error) -> Self {
        FactoscopeError::Encode(err.to_string())
    }
}

impl From<rmp_serde::decode::Error> for FactoscopeError {
    fn from(err: rmp_serde::decode::Error) -> Self {
        FactoscopeError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FactoscopeError>;
