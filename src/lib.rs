//! ecs-cli-integ library
//!
//! Building blocks for integration-testing the ecs-cli provisioning CLI:
//! subprocess runner, AWS client construction, resource naming, stack
//! assertions, and the container-instance polling loop.

pub mod clients;
pub mod cluster;
pub mod config;
pub mod error;
pub mod naming;
pub mod runner;
pub mod scenario;
pub mod stack;

// Re-export commonly used types
pub use clients::CloudClients;
pub use cluster::{tick_outcome, wait_for_active_instances, TickOutcome};
pub use config::IntegConfig;
pub use error::{IntegError, Result};
pub use naming::{build_id, cluster_name, stack_name, STACK_NAME_PREFIX};
pub use runner::{split_row_values, CliRunner, CommandOutput};
pub use scenario::{provision_and_verify, ScenarioReport};
pub use stack::{assert_stack_exists, delete_stack, StackSummary};
