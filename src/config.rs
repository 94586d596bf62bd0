use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::info;

use crate::error::ConfigError;
use crate::substitute::SubstitutionRule;

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "wasm-to-asm.toml";

const PKG_DIR: &str = "./rust/pkg";
const PKG_NAME: &str = "cardano_message_signing";

/// When artifact removal runs relative to the loader patches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ordering {
    /// Remove only after every patch has succeeded
    #[default]
    Sequenced,
    /// Remove right after scheduling the patches, without waiting on them
    Unordered,
}

impl std::fmt::Display for Ordering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ordering::Sequenced => write!(f, "sequenced"),
            Ordering::Unordered => write!(f, "unordered"),
        }
    }
}

fn default_targets() -> Vec<PathBuf> {
    vec![
        Path::new(PKG_DIR).join(format!("{PKG_NAME}_bg.js")),
        Path::new(PKG_DIR).join(format!("{PKG_NAME}.js")),
    ]
}

fn default_remove() -> Vec<PathBuf> {
    vec![Path::new(PKG_DIR).join(format!("{PKG_NAME}_bg.wasm"))]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchConfig {
    #[serde(default)]
    pub ordering: Ordering,

    /// Loader files rewritten in place
    #[serde(default = "default_targets")]
    pub targets: Vec<PathBuf>,

    /// Artifacts deleted once the loaders no longer reference them
    #[serde(default = "default_remove")]
    pub remove: Vec<PathBuf>,

    #[serde(default)]
    pub rule: SubstitutionRule,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            ordering: Ordering::default(),
            targets: default_targets(),
            remove: default_remove(),
            rule: SubstitutionRule::default(),
        }
    }
}

impl PatchConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Like [`PatchConfig::load`], but a missing file yields the built-in
    /// defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => {
                info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn save(&self, path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
        if path.exists() && !overwrite {
            return Err(format!(
                "{} already exists, pass --force to replace it",
                path.display()
            )
            .into());
        }

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(&self)?;
        fs::write(path, content)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rule.from.is_empty() {
            return Err(ConfigError::Invalid("rule.from must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target_key(target)) {
                return Err(ConfigError::Invalid(format!(
                    "target {} is listed more than once",
                    target.display()
                )));
            }
        }

        Ok(())
    }
}

/// `./a.js` and `a.js` name the same file
fn target_key(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_cardano_pkg() {
        let config = PatchConfig::default();
        assert_eq!(config.ordering, Ordering::Sequenced);
        assert_eq!(
            config.targets,
            vec![
                PathBuf::from("./rust/pkg/cardano_message_signing_bg.js"),
                PathBuf::from("./rust/pkg/cardano_message_signing.js"),
            ]
        );
        assert_eq!(
            config.remove,
            vec![PathBuf::from("./rust/pkg/cardano_message_signing_bg.wasm")]
        );
        assert_eq!(config.rule.from, "_bg.wasm");
        assert_eq!(config.rule.to, ".asm.js");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: PatchConfig = toml::from_str(
            r#"
ordering = "unordered"
targets = ["out/app.js"]
"#,
        )
        .unwrap();

        assert_eq!(config.ordering, Ordering::Unordered);
        assert_eq!(config.targets, vec![PathBuf::from("out/app.js")]);
        assert_eq!(config.remove, default_remove());
        assert_eq!(config.rule, SubstitutionRule::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join(DEFAULT_CONFIG_FILE);
        let config = PatchConfig {
            rule: SubstitutionRule::new("_bg.wasm", ".js"),
            ..Default::default()
        };

        config.save(&path, false).unwrap();
        assert_eq!(PatchConfig::load(&path).unwrap(), config);

        assert!(config.save(&path, false).is_err());
        assert!(config.save(&path, true).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        assert!(matches!(
            PatchConfig::load(&path),
            Err(ConfigError::NotFound(_))
        ));
        assert_eq!(
            PatchConfig::load_or_default(&path).unwrap(),
            PatchConfig::default()
        );
    }

    #[test]
    fn test_parse_error_reports_path() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "ordering = \"sideways\"").unwrap();

        match PatchConfig::load_or_default(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_empty_token() {
        let config = PatchConfig {
            rule: SubstitutionRule::new("", ".asm.js"),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_duplicate_targets() {
        let config = PatchConfig {
            targets: vec![PathBuf::from("a.js"), PathBuf::from("a.js")],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_same_target_spelled_differently() {
        let config = PatchConfig {
            targets: vec![
                PathBuf::from("./rust/pkg/a.js"),
                PathBuf::from("rust/pkg/a.js"),
            ],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let distinct = PatchConfig {
            targets: vec![PathBuf::from("./rust/pkg/a.js"), PathBuf::from("rust/a.js")],
            ..Default::default()
        };
        assert!(distinct.validate().is_ok());
    }
}
