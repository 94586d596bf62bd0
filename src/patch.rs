use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::error::PatchError;
use crate::substitute::SubstitutionRule;

/// A loader file that was rewritten in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub path: PathBuf,
    pub replacements: usize,
}

/// Read `path`, apply `rule` to the whole text and overwrite the file with
/// the result.
///
/// Nothing is written when the read fails. The write replaces the file
/// contents outright, without a temporary file.
pub async fn patch(path: &Path, rule: &SubstitutionRule) -> Result<PatchReport, PatchError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| PatchError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let substitution = rule.apply(&content);
    if substitution.replacements == 0 {
        debug!(
            "No occurrences of {:?} in {}, rewriting unchanged",
            rule.from,
            path.display()
        );
    }

    write_back(path, substitution.text).await?;

    info!(
        "Patched {} ({} replacement{})",
        path.display(),
        substitution.replacements,
        if substitution.replacements == 1 { "" } else { "s" }
    );

    Ok(PatchReport {
        path: path.to_path_buf(),
        replacements: substitution.replacements,
    })
}

async fn write_back(path: &Path, text: String) -> Result<(), PatchError> {
    fs::write(path, text)
        .await
        .map_err(|source| PatchError::Write {
            path: path.to_path_buf(),
            source,
        })
}
