//! Container-instance polling
//!
//! Waits for every container instance registered in a cluster to report
//! ACTIVE. The loop runs on a fixed interval with a bounded attempt budget:
//! a listing error, an empty cluster, or a not-yet-active instance all wait
//! one interval and try again. The per-tick decision is a pure function so
//! the state machine tests without AWS.

use crate::error::{IntegError, Result};
use aws_sdk_ecs::Client as EcsClient;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Attempt budget for one wait: `DEFAULT_MAX_ATTEMPTS * DEFAULT_POLL_INTERVAL`
/// is how long the harness is willing to wait before failing the run.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

const ACTIVE_STATUS: &str = "ACTIVE";

/// Outcome of a single poll tick.
#[derive(Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep polling: nothing registered yet, or some instance not yet ACTIVE.
    Polling,
    /// Every registered instance is ACTIVE.
    Settled,
}

/// Decide a tick from the statuses the describe call reported.
///
/// Zero instances never settles; the cluster is only ready once at least one
/// instance exists and every status reads ACTIVE.
pub fn tick_outcome(statuses: &[Option<&str>]) -> TickOutcome {
    if statuses.is_empty() {
        return TickOutcome::Polling;
    }
    if statuses.iter().all(|s| *s == Some(ACTIVE_STATUS)) {
        TickOutcome::Settled
    } else {
        TickOutcome::Polling
    }
}

/// Poll until every container instance in `cluster` is ACTIVE.
///
/// Returns the instance ARNs on success. Exhausting the attempt budget is an
/// error naming the cluster and the total elapsed wait.
pub async fn wait_for_active_instances(
    ecs: &EcsClient,
    cluster: &str,
    max_attempts: u32,
    interval: Duration,
) -> Result<Vec<String>> {
    let pb = ProgressBar::new(max_attempts as u64);
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Waiting for active instances in {}...", cluster));

    for attempt in 0..max_attempts {
        match poll_once(ecs, cluster).await {
            Ok((TickOutcome::Settled, arns)) => {
                pb.finish_with_message("All container instances active");
                info!(
                    "Cluster {} has {} active container instances",
                    cluster,
                    arns.len()
                );
                return Ok(arns);
            }
            Ok((TickOutcome::Polling, _)) => {
                pb.set_message(format!(
                    "Not all instances active yet (attempt {}/{})",
                    attempt + 1,
                    max_attempts
                ));
            }
            Err(e) => {
                // Listing/describe errors are treated as "not ready yet" and
                // retried within the same budget.
                debug!("Poll error for cluster {}: {}", cluster, e);
                pb.set_message(format!(
                    "Listing failed, retrying (attempt {}/{})",
                    attempt + 1,
                    max_attempts
                ));
            }
        }
        pb.set_position((attempt + 1) as u64);
        sleep(interval).await;
    }

    pb.finish_with_message("Timed out");
    Err(IntegError::PollTimeout {
        cluster: cluster.to_string(),
        elapsed_secs: max_attempts as u64 * interval.as_secs(),
    })
}

async fn poll_once(ecs: &EcsClient, cluster: &str) -> Result<(TickOutcome, Vec<String>)> {
    let listed = ecs
        .list_container_instances()
        .cluster(cluster)
        .send()
        .await
        .map_err(|e| {
            IntegError::Ecs(format!("ListContainerInstances failed for {}: {}", cluster, e))
        })?;

    let arns = listed.container_instance_arns().to_vec();
    if arns.is_empty() {
        return Ok((TickOutcome::Polling, arns));
    }

    let described = ecs
        .describe_container_instances()
        .cluster(cluster)
        .set_container_instances(Some(arns.clone()))
        .send()
        .await
        .map_err(|e| {
            IntegError::Ecs(format!(
                "DescribeContainerInstances failed for {}: {}",
                cluster, e
            ))
        })?;

    let statuses: Vec<Option<&str>> = described
        .container_instances()
        .iter()
        .map(|ci| ci.status())
        .collect();

    Ok((tick_outcome(&statuses), arns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_instances_keeps_polling() {
        assert_eq!(tick_outcome(&[]), TickOutcome::Polling);
    }

    #[test]
    fn test_all_active_settles() {
        assert_eq!(
            tick_outcome(&[Some("ACTIVE"), Some("ACTIVE")]),
            TickOutcome::Settled
        );
    }

    #[test]
    fn test_mixed_statuses_keep_polling() {
        assert_eq!(
            tick_outcome(&[Some("ACTIVE"), Some("REGISTERING")]),
            TickOutcome::Polling
        );
        assert_eq!(
            tick_outcome(&[Some("DRAINING")]),
            TickOutcome::Polling
        );
    }

    #[test]
    fn test_missing_status_keeps_polling() {
        assert_eq!(tick_outcome(&[Some("ACTIVE"), None]), TickOutcome::Polling);
    }

    #[test]
    fn test_default_budget_is_five_minutes() {
        let total = DEFAULT_MAX_ATTEMPTS as u64 * DEFAULT_POLL_INTERVAL.as_secs();
        assert_eq!(total, 300);
    }
}
