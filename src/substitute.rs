//! Literal token substitution over loader sources.

use serde::{Deserialize, Serialize};

/// Token wasm-bindgen uses to locate the companion binary
pub const WASM_TOKEN: &str = "_bg.wasm";

/// Token naming the precompiled asm.js module that replaces it
pub const ASM_JS_TOKEN: &str = ".asm.js";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRule {
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default = "default_to")]
    pub to: String,
}

fn default_from() -> String {
    WASM_TOKEN.to_string()
}

fn default_to() -> String {
    ASM_JS_TOKEN.to_string()
}

impl Default for SubstitutionRule {
    fn default() -> Self {
        Self {
            from: default_from(),
            to: default_to(),
        }
    }
}

/// Rewritten text along with how many occurrences were replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    pub replacements: usize,
}

impl SubstitutionRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Replace every non-overlapping occurrence of `from`, left to right.
    ///
    /// `from` must be non-empty; [`crate::config::PatchConfig::validate`]
    /// rejects rules that violate this before any file is touched.
    pub fn apply(&self, text: &str) -> Substitution {
        if self.from.is_empty() {
            return Substitution {
                text: text.to_string(),
                replacements: 0,
            };
        }

        let replacements = text.matches(self.from.as_str()).count();
        let text = if replacements == 0 {
            text.to_string()
        } else {
            text.replace(self.from.as_str(), &self.to)
        };

        Substitution { text, replacements }
    }
}
