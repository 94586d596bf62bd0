use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::error::PatchError;

/// Delete each artifact in order, stopping at the first one that cannot be
/// removed. A missing artifact counts as a failure.
pub async fn cleanup(paths: &[PathBuf]) -> Result<Vec<PathBuf>, PatchError> {
    let mut removed = Vec::with_capacity(paths.len());
    for path in paths {
        remove_artifact(path).await?;
        removed.push(path.clone());
    }
    Ok(removed)
}

pub async fn remove_artifact(path: &Path) -> Result<(), PatchError> {
    fs::remove_file(path)
        .await
        .map_err(|source| PatchError::Remove {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Removed {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_cleanup_removes_artifact() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let wasm = dir.path().join("pkg_bg.wasm");
        std::fs::write(&wasm, b"\0asm").unwrap();

        let removed = cleanup(&[wasm.clone()]).await.unwrap();

        assert_eq!(removed, vec![wasm.clone()]);
        assert!(!wasm.exists());
    }

    #[tokio::test]
    async fn test_cleanup_missing_artifact_fails() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let wasm = dir.path().join("pkg_bg.wasm");

        match cleanup(&[wasm.clone()]).await {
            Err(PatchError::Remove { path, source }) => {
                assert_eq!(path, wasm);
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("Expected remove error, got {:?}", other),
        }
    }
}
