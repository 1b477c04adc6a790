//! AWS client construction
//!
//! One shared SDK config load feeds both service clients. A run that cannot
//! resolve a region aborts immediately; nothing downstream could succeed.

use crate::error::{IntegError, Result};
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_cloudformation::Client as CfnClient;
use aws_sdk_ecs::Client as EcsClient;

/// Environment variable the harness consults for the target region.
pub const REGION_ENV: &str = "AWS_DEFAULT_REGION";

/// Typed clients for the two services the harness observes.
pub struct CloudClients {
    pub cfn: CfnClient,
    pub ecs: EcsClient,
}

impl CloudClients {
    /// Build both service clients from one SDK config load.
    ///
    /// Region resolution: explicit override, then `AWS_DEFAULT_REGION`, then
    /// the SDK default provider chain.
    pub async fn connect(region_override: Option<String>) -> Result<Self> {
        let sdk_config = load_sdk_config(region_override).await;
        if sdk_config.region().is_none() {
            return Err(IntegError::Validation {
                field: "region".to_string(),
                reason: format!("no AWS region configured; set {}", REGION_ENV),
            });
        }
        Ok(Self::from_sdk_config(&sdk_config))
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self {
            cfn: CfnClient::new(sdk_config),
            ecs: EcsClient::new(sdk_config),
        }
    }
}

async fn load_sdk_config(region_override: Option<String>) -> SdkConfig {
    let env_region = std::env::var(REGION_ENV).ok().map(Region::new);
    let region = RegionProviderChain::first_try(region_override.map(Region::new))
        .or_else(env_region)
        .or_default_provider();

    aws_config::defaults(BehaviorVersion::latest())
        .region(region)
        .load()
        .await
}
