//! CloudFormation stack assertion and teardown

use crate::error::{IntegError, Result};
use crate::naming::stack_name;
use aws_sdk_cloudformation::Client as CfnClient;
use tracing::{info, warn};

/// The stack backing a provisioned cluster.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StackSummary {
    pub name: String,
    pub status: Option<String>,
}

/// Succeeds only when exactly the expected stack exists.
///
/// An API error, zero stacks, a name mismatch, or more than one match all
/// fail the check.
pub async fn assert_stack_exists(cfn: &CfnClient, cluster_name: &str) -> Result<StackSummary> {
    let expected = stack_name(cluster_name);

    let response = cfn
        .describe_stacks()
        .stack_name(&expected)
        .send()
        .await
        .map_err(|e| {
            IntegError::CloudFormation(format!("DescribeStacks failed for {}: {}", expected, e))
        })?;

    match response.stacks() {
        [] => Err(IntegError::StackNotFound {
            stack_name: expected,
            reason: "no stacks returned".to_string(),
        }),
        [stack] if stack.stack_name() == Some(expected.as_str()) => {
            info!("Found stack {}", expected);
            Ok(StackSummary {
                name: expected,
                status: stack.stack_status().map(|s| s.as_str().to_string()),
            })
        }
        [stack] => Err(IntegError::StackNotFound {
            stack_name: expected,
            reason: format!(
                "unexpected stack {} returned",
                stack.stack_name().unwrap_or("<unnamed>")
            ),
        }),
        many => Err(IntegError::StackNotFound {
            stack_name: expected,
            reason: format!("{} stacks matched", many.len()),
        }),
    }
}

/// Best-effort stack deletion.
///
/// Failures are logged and swallowed; a leaked stack is an accepted
/// limitation of the harness, not a test failure.
pub async fn delete_stack(cfn: &CfnClient, cluster_name: &str) {
    let name = stack_name(cluster_name);
    match cfn.delete_stack().stack_name(&name).send().await {
        Ok(_) => info!("Requested deletion of stack {}", name),
        Err(e) => warn!("Failed to delete stack {}: {}", name, e),
    }
}
