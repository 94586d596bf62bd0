//! The patch/cleanup task
//!
//! Every loader patch runs as its own tokio task. Artifact removal is gated
//! according to the configured [`Ordering`]:
//! - `Sequenced` waits for all patches and skips removal if any failed
//! - `Unordered` removes immediately and only reports patch failures

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::cleanup::cleanup;
use crate::config::{Ordering, PatchConfig};
use crate::error::{PatchError, TaskError};
use crate::patch::{patch, PatchReport};
use crate::substitute::SubstitutionRule;

/// What a completed run did
#[derive(Debug, Default)]
pub struct RunSummary {
    pub patched: Vec<PatchReport>,
    pub removed: Vec<PathBuf>,
    /// Patch failures tolerated under [`Ordering::Unordered`]
    pub failures: Vec<PatchError>,
}

impl RunSummary {
    pub fn replacements(&self) -> usize {
        self.patched.iter().map(|report| report.replacements).sum()
    }
}

pub struct PatchTask {
    rule: Arc<SubstitutionRule>,
    config: PatchConfig,
}

impl PatchTask {
    pub fn new(config: PatchConfig) -> Self {
        Self {
            rule: Arc::new(config.rule.clone()),
            config,
        }
    }

    pub fn with_ordering(mut self, ordering: Ordering) -> Self {
        self.config.ordering = ordering;
        self
    }

    pub fn ordering(&self) -> Ordering {
        self.config.ordering
    }

    /// Nothing is read, written or removed when the configuration is invalid.
    pub async fn run(self) -> Result<RunSummary, TaskError> {
        self.config.validate()?;

        info!(
            "Patching {} loader file(s), removing {} artifact(s) ({})",
            self.config.targets.len(),
            self.config.remove.len(),
            self.config.ordering
        );

        let pending = self.spawn_patches();

        match self.config.ordering {
            Ordering::Sequenced => {
                let (patched, failures) = settle(pending).await;

                if !failures.is_empty() {
                    for failure in &failures {
                        error!("{failure}");
                    }
                    return Err(TaskError::Patches(failures));
                }

                let removed = cleanup(&self.config.remove).await.map_err(|err| {
                    error!("{err}");
                    TaskError::Cleanup(err)
                })?;

                Ok(RunSummary {
                    patched,
                    removed,
                    failures,
                })
            }
            Ordering::Unordered => {
                let cleaned = cleanup(&self.config.remove).await;
                let (patched, failures) = settle(pending).await;

                for failure in &failures {
                    warn!("{failure}");
                }

                match cleaned {
                    Ok(removed) => Ok(RunSummary {
                        patched,
                        removed,
                        failures,
                    }),
                    Err(err) => {
                        error!("{err}");
                        Err(TaskError::Cleanup(err))
                    }
                }
            }
        }
    }

    fn spawn_patches(&self) -> Pending {
        let mut set = JoinSet::new();
        for (index, path) in self.config.targets.iter().enumerate() {
            let rule = self.rule.clone();
            let path = path.clone();
            set.spawn(async move { (index, patch(&path, &rule).await) });
        }
        Pending {
            set,
            targets: self.config.targets.clone(),
        }
    }
}

struct Pending {
    set: JoinSet<(usize, Result<PatchReport, PatchError>)>,
    targets: Vec<PathBuf>,
}

/// Wait for every patch task, returning reports and failures in target order.
async fn settle(mut pending: Pending) -> (Vec<PatchReport>, Vec<PatchError>) {
    let mut outcomes: Vec<Option<Result<PatchReport, PatchError>>> =
        pending.targets.iter().map(|_| None).collect();

    while let Some(joined) = pending.set.join_next().await {
        match joined {
            Ok((index, outcome)) => outcomes[index] = Some(outcome),
            // The index is lost with the task; filled in below
            Err(err) => warn!("Patch task aborted: {err}"),
        }
    }

    let mut patched = Vec::new();
    let mut failures = Vec::new();
    for (outcome, path) in outcomes.into_iter().zip(pending.targets) {
        match outcome {
            Some(Ok(report)) => patched.push(report),
            Some(Err(err)) => failures.push(err),
            None => failures.push(PatchError::Task {
                path,
                reason: "task panicked or was cancelled".into(),
            }),
        }
    }
    (patched, failures)
}
