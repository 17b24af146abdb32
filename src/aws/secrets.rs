use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use tracing::{debug, info};

use super::SecretWriter;

/// Secret writer backed by AWS Secrets Manager
#[derive(Debug, Clone)]
pub struct SecretsManagerWriter {
    client: SecretsManagerClient,
}

impl SecretsManagerWriter {
    pub fn new(config: &SdkConfig) -> Self {
        Self::from_client(SecretsManagerClient::new(config))
    }

    pub fn from_client(client: SecretsManagerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretWriter for SecretsManagerWriter {
    async fn write_secret(&self, name: &str, value: &str) -> Result<()> {
        debug!("Updating secret: {}", name);

        let updated = self
            .client
            .put_secret_value()
            .secret_id(name)
            .secret_string(value)
            .send()
            .await;

        match updated {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) =>
            {
                info!("Secret {} does not exist yet, creating it", name);
                self.client
                    .create_secret()
                    .name(name)
                    .secret_string(value)
                    .send()
                    .await
                    .with_context(|| format!("Failed to create secret {name}"))?;
                Ok(())
            }
            Err(err) => Err(err).with_context(|| format!("Failed to update secret {name}")),
        }
    }
}
