//! The end-to-end provision scenario
//!
//! Shared by the `run` subcommand and the integration test: provision a
//! cluster through the CLI under test, verify the stack and container
//! instances, then tear the stack down. Teardown runs even when a step
//! failed, so a broken run does not leak the stack.

use crate::clients::CloudClients;
use crate::cluster::wait_for_active_instances;
use crate::config::IntegConfig;
use crate::error::{IntegError, Result};
use crate::naming;
use crate::runner::{split_row_values, CliRunner, CommandOutput};
use crate::stack;
use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// What a completed scenario provisioned and observed.
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub cluster_name: String,
    pub stack_name: String,
    pub active_instances: usize,
    pub elapsed_secs: u64,
}

/// Run the full up scenario: CLI `up`, stack assertion, instance polling,
/// best-effort teardown.
pub async fn provision_and_verify(config: &IntegConfig) -> Result<ScenarioReport> {
    let started = Instant::now();

    let clients = CloudClients::connect(config.aws.region.clone()).await?;
    let runner = CliRunner::locate(config.cli.bin.as_deref());
    let cluster_name = naming::cluster_name();
    info!("Provisioning cluster {}", cluster_name);

    let up = runner
        .run(&["up", "-c", &cluster_name, "--capability-iam", "--force"])
        .and_then(|output| assert_output_names_cluster(&output, &cluster_name));

    // Verify only after a clean CLI exit, but always attempt teardown:
    // DeleteStack on a half-created stack is harmless.
    let verified = match up {
        Ok(()) => verify(&clients, &cluster_name, config).await,
        Err(e) => Err(e),
    };
    stack::delete_stack(&clients.cfn, &cluster_name).await;
    let active_instances = verified?;

    Ok(ScenarioReport {
        stack_name: naming::stack_name(&cluster_name),
        cluster_name,
        active_instances,
        elapsed_secs: started.elapsed().as_secs(),
    })
}

/// The CLI names the cluster it acted on in its output; a clean exit whose
/// output never mentions the cluster means it provisioned something else.
fn assert_output_names_cluster(output: &CommandOutput, cluster_name: &str) -> Result<()> {
    let mentioned = output
        .stdout
        .lines()
        .chain(output.stderr.lines())
        .flat_map(split_row_values)
        .any(|value| value.contains(cluster_name));

    if mentioned {
        Ok(())
    } else {
        Err(IntegError::Validation {
            field: "cli output".to_string(),
            reason: format!("up output never mentions cluster {}", cluster_name),
        })
    }
}

async fn verify(
    clients: &CloudClients,
    cluster_name: &str,
    config: &IntegConfig,
) -> Result<usize> {
    stack::assert_stack_exists(&clients.cfn, cluster_name).await?;
    let arns = wait_for_active_instances(
        &clients.ecs,
        cluster_name,
        config.poll.max_attempts,
        config.poll_interval(),
    )
    .await?;
    Ok(arns.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stdout: &str, stderr: &str) -> CommandOutput {
        CommandOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_output_naming_cluster_in_a_table_row_passes() {
        let out = output("NAME            STATUS\nbuild123-1700000000   CREATE_COMPLETE\n", "");
        assert!(assert_output_names_cluster(&out, "build123-1700000000").is_ok());
    }

    #[test]
    fn test_output_naming_cluster_on_stderr_passes() {
        // ecs-cli logs through stderr; cluster=<name> is one row value.
        let out = output("", "INFO[0001] Created cluster  cluster=build123-1700000000\n");
        assert!(assert_output_names_cluster(&out, "build123-1700000000").is_ok());
    }

    #[test]
    fn test_silent_output_fails() {
        let out = output("done\n", "");
        let err = assert_output_names_cluster(&out, "build123-1700000000").unwrap_err();
        assert!(matches!(err, IntegError::Validation { .. }));
    }
}
