use std::io;
use std::path::PathBuf;

/// Failure of a single patch or removal, always tied to the path involved.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to remove {}: {source}", .path.display())]
    Remove { path: PathBuf, source: io::Error },

    #[error("patch task for {} did not complete: {reason}", .path.display())]
    Task { path: PathBuf, reason: String },
}

impl PatchError {
    /// The path this failure is about
    pub fn path(&self) -> &PathBuf {
        match self {
            PatchError::Read { path, .. }
            | PatchError::Write { path, .. }
            | PatchError::Remove { path, .. }
            | PatchError::Task { path, .. } => path,
        }
    }
}

/// Fatal outcome of a run
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("{} of the loader patches failed, leaving the wasm artifact in place", .0.len())]
    Patches(Vec<PatchError>),

    #[error(transparent)]
    Cleanup(PatchError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
