use anyhow::Result;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_smithy_types::DateTime;
use tracing::info;

use crate::constants::DEFAULT_AWS_REGION;

pub mod secrets;
pub mod sts;

/// AWS temporary credentials structure
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime,
}

/// Issues temporary credentials for a role
#[async_trait]
pub trait RoleAssumer: Send + Sync {
    async fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
        duration_seconds: i32,
    ) -> Result<Credentials>;
}

/// Stores a secret value under a name, creating it when missing
#[async_trait]
pub trait SecretWriter: Send + Sync {
    async fn write_secret(&self, name: &str, value: &str) -> Result<()>;
}

/// Load shared AWS config
/// Priority: region override -> ENV vars / config file / metadata -> DEFAULT_AWS_REGION
pub async fn load_sdk_config(region_override: Option<&str>) -> SdkConfig {
    if let Some(region) = region_override {
        info!("Using region override: {}", region);
        return aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
    }

    let loaded = aws_config::defaults(BehaviorVersion::latest()).load().await;
    match loaded.region() {
        Some(region) => {
            info!("Using region: {}", region);
            loaded
        }
        None => {
            info!("No region configured, using default {}", DEFAULT_AWS_REGION);
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(DEFAULT_AWS_REGION))
                .load()
                .await
        }
    }
}
