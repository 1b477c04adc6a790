use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ecs_cli_integ::clients::CloudClients;
use ecs_cli_integ::cluster;
use ecs_cli_integ::config::IntegConfig;
use ecs_cli_integ::runner::CliRunner;
use ecs_cli_integ::scenario;
use ecs_cli_integ::{naming, stack};

#[derive(Parser)]
#[command(name = "ecs-cli-integ")]
#[command(
    about = "Integration-test harness for the ecs-cli provisioning CLI",
    long_about = "ecs-cli-integ drives the ecs-cli cluster provisioning CLI and verifies the\nAWS resources it creates.\n\nOperations:\n  - up: provision a cluster through the CLI under test\n  - check: assert the backing CloudFormation stack exists\n  - wait: poll container instances until all are ACTIVE\n  - cleanup: best-effort stack deletion (e.g. after a failed CI job)\n  - run: the full provision-verify-teardown scenario"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    output: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision a cluster through the CLI under test
    Up {
        /// Cluster name (derived from the build id and a timestamp if omitted)
        #[arg(short = 'c', long)]
        cluster: Option<String>,
    },
    /// Assert the CloudFormation stack backing a cluster exists
    Check {
        /// Cluster name
        cluster: String,
    },
    /// Poll until every container instance in a cluster is ACTIVE
    Wait {
        /// Cluster name
        cluster: String,
    },
    /// Delete the CloudFormation stack backing a cluster (best-effort)
    Cleanup {
        /// Cluster name
        cluster: String,
    },
    /// Run the full scenario: up, stack check, instance wait, teardown
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging - suppress INFO by default, only show warnings and errors
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load config
    let config = IntegConfig::load(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Up { cluster } => {
            let cluster = cluster.unwrap_or_else(naming::cluster_name);
            let runner = CliRunner::locate(config.cli.bin.as_deref());
            runner.run(&["up", "-c", &cluster, "--capability-iam", "--force"])?;
            println!("Provisioned cluster: {}", cluster);
            println!("Stack: {}", naming::stack_name(&cluster));
        }
        Commands::Check { cluster } => {
            let clients = CloudClients::connect(config.aws.region.clone()).await?;
            let summary = stack::assert_stack_exists(&clients.cfn, &cluster).await?;
            if cli.output == "json" {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "Stack {} exists ({})",
                    summary.name,
                    summary.status.as_deref().unwrap_or("status unknown")
                );
            }
        }
        Commands::Wait { cluster } => {
            let clients = CloudClients::connect(config.aws.region.clone()).await?;
            let arns = cluster::wait_for_active_instances(
                &clients.ecs,
                &cluster,
                config.poll.max_attempts,
                config.poll_interval(),
            )
            .await?;
            println!("{} container instances active in {}", arns.len(), cluster);
        }
        Commands::Cleanup { cluster } => {
            let clients = CloudClients::connect(config.aws.region.clone()).await?;
            stack::delete_stack(&clients.cfn, &cluster).await;
            println!("Requested deletion of {}", naming::stack_name(&cluster));
        }
        Commands::Run => {
            let report = scenario::provision_and_verify(&config).await?;
            if cli.output == "json" {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Cluster {} verified: {} active instances in {}s",
                    report.cluster_name, report.active_instances, report.elapsed_secs
                );
            }
        }
    }

    Ok(())
}
