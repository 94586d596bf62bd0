//! Rewrites wasm-bindgen loader files to import a precompiled asm.js module
//! instead of the `.wasm` binary, then removes the binary.

pub mod cleanup;
pub mod config;
pub mod error;
pub mod patch;
pub mod substitute;
pub mod task;

pub use config::{Ordering, PatchConfig, DEFAULT_CONFIG_FILE};
pub use error::{ConfigError, PatchError, TaskError};
pub use patch::PatchReport;
pub use substitute::SubstitutionRule;
pub use task::{PatchTask, RunSummary};
