//! Control loop driving one solver session at a time
//!
//! Monitoring writes stage samples into the repository; each tick commits
//! them. A session freezes the genome layout, seeds the search from committed
//! values and turns candidate genomes into actuator calls.

use chrono::{DateTime, Utc};
use fleetloop_actuator::{apply_changes, ActuationReport, Actuator};
use fleetloop_common::{Objective, Result};
use fleetloop_encoding::SolutionEncoding;
use fleetloop_repository::{Repository, RepositoryStats};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

/// Result of one commit/observe tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    pub at: DateTime<Utc>,
    /// Samples promoted from staging to committed
    pub committed: usize,
    pub stats: RepositoryStats,
}

pub struct ControlLoop {
    repository: Arc<Repository>,
    actuator: Arc<dyn Actuator>,
    timeout: Duration,
}

impl ControlLoop {
    pub fn new(repository: Arc<Repository>, actuator: Arc<dyn Actuator>, timeout: Duration) -> Self {
        Self {
            repository,
            actuator,
            timeout,
        }
    }

    pub fn repository(&self) -> &Arc<Repository> {
        &self.repository
    }

    /// Freeze an encoding over `objectives`, or every declared objective when empty
    pub fn begin_session(&self, objectives: &[Arc<Objective>]) -> Result<SolutionEncoding> {
        let session = if objectives.is_empty() {
            SolutionEncoding::for_all_objectives(&self.repository)?
        } else {
            SolutionEncoding::build(&self.repository, objectives)?
        };
        info!(
            objectives = session.objectives().len(),
            genome_len = session.genome_len(),
            "Began solver session"
        );
        Ok(session)
    }

    /// Genome of the currently committed primitive values
    pub fn seed_genome(&self, session: &SolutionEncoding) -> Result<Vec<f64>> {
        Ok(session.encode_current()?)
    }

    /// Actuate every primitive of a candidate genome
    #[instrument(skip_all, fields(genome_len = genome.len()))]
    pub async fn apply_candidate(&self, session: &SolutionEncoding, genome: &[f64]) -> Result<ActuationReport> {
        let plan = session.actuation_plan(genome)?;
        Ok(apply_changes(self.actuator.as_ref(), &plan, self.timeout).await)
    }

    /// Commit staged samples and snapshot repository counts
    pub fn tick(&self) -> TickReport {
        let committed = self.repository.commit_staged();
        let report = TickReport {
            at: Utc::now(),
            committed,
            stats: self.repository.stats(),
        };
        debug!(committed, stats = ?report.stats, "Tick");
        report
    }

    /// Tick every `interval` until `shutdown` flips to true
    pub async fn run(&self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        info!(interval_ms = interval.as_millis() as u64, "Control loop started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Control loop stopped");
    }
}
