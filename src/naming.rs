//! Resource naming for integration runs
//!
//! Every run derives a fresh cluster name from the CI build identifier and a
//! Unix timestamp, so parallel CI jobs and back-to-back runs never collide on
//! cloud resources. The CloudFormation stack name is the cluster name behind
//! a fixed prefix applied by the CLI under test.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Prefix the provisioning CLI applies to the CloudFormation stack it creates.
pub const STACK_NAME_PREFIX: &str = "amazon-ecs-cli-setup-";

/// Environment variable carrying the CI build identifier.
pub const BUILD_ID_ENV: &str = "CODEBUILD_BUILD_ID";

// Last timestamp handed out; names derived within the same second must still
// differ.
static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Returns the CI build id, sanitized for CloudFormation (':' is not a legal
/// stack name character).
pub fn build_id() -> String {
    std::env::var(BUILD_ID_ENV)
        .unwrap_or_default()
        .replace(':', "-")
}

fn next_stamp() -> i64 {
    let now = Utc::now().timestamp();
    let prev = LAST_STAMP
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(if now > last { now } else { last + 1 })
        })
        .unwrap_or(0);
    if now > prev {
        now
    } else {
        prev + 1
    }
}

/// Derive a unique cluster name for this run: `<buildId>-<unixTimestamp>`.
pub fn cluster_name() -> String {
    format!("{}-{}", build_id(), next_stamp())
}

/// CloudFormation stack name backing a cluster.
pub fn stack_name(cluster_name: &str) -> String {
    format!("{}{}", STACK_NAME_PREFIX, cluster_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_name_is_prefixed_cluster_name() {
        assert_eq!(
            stack_name("build123-1700000000"),
            "amazon-ecs-cli-setup-build123-1700000000"
        );
    }

    #[test]
    fn test_build_id_sanitizes_colons() {
        // Set and read in one test so parallel tests never observe a
        // half-mutated environment.
        std::env::set_var(BUILD_ID_ENV, "project:build:42");
        assert_eq!(build_id(), "project-build-42");
        assert!(cluster_name().starts_with("project-build-42-"));
        std::env::remove_var(BUILD_ID_ENV);
    }

    #[test]
    fn test_cluster_names_in_rapid_succession_are_unique() {
        let a = cluster_name();
        let b = cluster_name();
        let c = cluster_name();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_cluster_name_ends_with_numeric_stamp() {
        let name = cluster_name();
        let stamp = name.rsplit('-').next().unwrap();
        assert!(stamp.parse::<i64>().is_ok(), "bad stamp in {}", name);
    }
}
