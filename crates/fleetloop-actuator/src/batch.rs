//! Timeouts and per-candidate batches
//!
//! There is no native cancellation of an external command: a caller timeout
//! drops the in-flight future, which kills the child, and counts as a failed
//! actuation.

use fleetloop_common::ActuationError;
use fleetloop_encoding::PrimitiveChange;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::Actuator;

/// Run one actuation with a caller-imposed timeout; expiry is a failure
pub async fn execute_with_timeout<A>(actuator: &A, alias: &str, values: &[i64], timeout: Duration) -> bool
where
    A: Actuator + ?Sized,
{
    match tokio::time::timeout(timeout, actuator.execute(alias, values)).await {
        Ok(applied) => applied,
        Err(_) => {
            let err = ActuationError::Timeout {
                alias: alias.to_string(),
                elapsed_ms: timeout.as_millis() as u64,
            };
            warn!(%err, "Actuation abandoned");
            false
        }
    }
}

/// Outcome of applying one candidate's changes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuationReport {
    /// Aliases changed successfully
    pub applied: Vec<String>,
    /// Aliases whose change failed or timed out
    pub failed: Vec<String>,
}

impl ActuationReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.applied.len() + self.failed.len()
    }
}

/// Apply every change of a candidate independently.
///
/// One failing primitive never stops the others; failures are collected in
/// the report. A NaN or infinite value is a failure and is never handed to
/// the actuator.
pub async fn apply_changes<A>(actuator: &A, changes: &[PrimitiveChange], timeout: Duration) -> ActuationReport
where
    A: Actuator + ?Sized,
{
    let attempts = changes.iter().map(|change| async move {
        if !change.value.is_finite() {
            warn!(alias = %change.alias, value = change.value, "Refusing non-finite setting");
            return (change.alias.clone(), false);
        }
        let value = change.value.round() as i64;
        let applied = execute_with_timeout(actuator, &change.alias, &[value], timeout).await;
        (change.alias.clone(), applied)
    });

    let mut report = ActuationReport::default();
    for (alias, applied) in join_all(attempts).await {
        if applied {
            report.applied.push(alias);
        } else {
            report.failed.push(alias);
        }
    }

    info!(
        applied = report.applied.len(),
        failed = report.failed.len(),
        "Applied candidate"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Succeeds except for listed aliases; sleeps on `slow` aliases
    #[derive(Default)]
    struct FakeActuator {
        failing: Vec<String>,
        slow: Vec<String>,
        seen: Mutex<Vec<(String, i64)>>,
    }

    #[async_trait]
    impl Actuator for FakeActuator {
        async fn execute(&self, alias: &str, values: &[i64]) -> bool {
            self.seen.lock().push((alias.to_string(), values[0]));
            if self.slow.iter().any(|a| a == alias) {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            !self.failing.iter().any(|a| a == alias)
        }
    }

    fn change(alias: &str, value: f64) -> PrimitiveChange {
        PrimitiveChange {
            primitive: alias.replacen('-', "/", 1),
            alias: alias.to_string(),
            value,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_failure() {
        let actuator = FakeActuator {
            slow: vec!["vm-1-mem".into()],
            ..Default::default()
        };
        assert!(!execute_with_timeout(&actuator, "vm-1-mem", &[2048], Duration::from_millis(100)).await);
        assert!(execute_with_timeout(&actuator, "vm-1-cpu", &[2], Duration::from_millis(100)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_aggregated_per_candidate() {
        let actuator = FakeActuator {
            failing: vec!["vm-2-cpu".into()],
            slow: vec!["vm-3-mem".into()],
            ..Default::default()
        };
        let changes = vec![
            change("vm-1-mem", 2047.6),
            change("vm-2-cpu", 4.0),
            change("vm-3-mem", 1024.0),
        ];

        let report = apply_changes(&actuator, &changes, Duration::from_secs(1)).await;

        assert_eq!(report.applied, vec!["vm-1-mem".to_string()]);
        assert_eq!(
            report.failed,
            vec!["vm-2-cpu".to_string(), "vm-3-mem".to_string()]
        );
        assert!(!report.is_success());
        assert_eq!(report.total(), 3);

        // Every change was attempted, values rounded
        let seen = actuator.seen.lock();
        assert_eq!(seen.len(), 3);
        assert!(seen.contains(&("vm-1-mem".to_string(), 2048)));
    }

    #[tokio::test]
    async fn test_non_finite_values_fail_without_actuation() {
        let actuator = FakeActuator::default();
        let changes = vec![
            change("vm-1-mem", f64::NAN),
            change("vm-1-cpu", f64::INFINITY),
            change("vm-2-mem", 1024.0),
        ];

        let report = apply_changes(&actuator, &changes, Duration::from_secs(1)).await;

        assert_eq!(report.applied, vec!["vm-2-mem".to_string()]);
        assert_eq!(
            report.failed,
            vec!["vm-1-mem".to_string(), "vm-1-cpu".to_string()]
        );
        assert_eq!(
            *actuator.seen.lock(),
            vec![("vm-2-mem".to_string(), 1024)]
        );
    }

    #[tokio::test]
    async fn test_empty_candidate() {
        let actuator = FakeActuator::default();
        let report = apply_changes(&actuator, &[], Duration::from_secs(1)).await;
        assert!(report.is_success());
        assert_eq!(report.total(), 0);
    }
}
