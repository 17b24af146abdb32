use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sts::Client as StsClient;
use tracing::{debug, info};

use super::{Credentials, RoleAssumer};

/// Role assumer backed by AWS STS AssumeRole
#[derive(Debug, Clone)]
pub struct StsRoleAssumer {
    client: StsClient,
}

impl StsRoleAssumer {
    pub fn new(config: &SdkConfig) -> Self {
        Self::from_client(StsClient::new(config))
    }

    pub fn from_client(client: StsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RoleAssumer for StsRoleAssumer {
    async fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
        duration_seconds: i32,
    ) -> Result<Credentials> {
        info!("Calling AWS STS AssumeRole");
        debug!("Role ARN: {}", role_arn);
        debug!("Session name: {}", session_name);
        debug!("Duration: {} seconds", duration_seconds);

        let response = self
            .client
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .duration_seconds(duration_seconds)
            .send()
            .await
            .with_context(|| format!("Failed to assume role {role_arn}"))?;

        let sts_creds = response
            .credentials()
            .context("AWS STS returned no credentials")?;

        Ok(Credentials {
            access_key_id: sts_creds.access_key_id().to_string(),
            secret_access_key: sts_creds.secret_access_key().to_string(),
            session_token: sts_creds.session_token().to_string(),
            expiration: *sts_creds.expiration(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_sts::Client;
    use aws_sdk_sts::config::retry::RetryConfig;
    use aws_sdk_sts::operation::assume_role::AssumeRoleOutput;
    use aws_sdk_sts::types::Credentials as StsCredentials;
    use aws_smithy_mocks::{Rule, RuleMode, mock, mock_client};
    use aws_smithy_types::DateTime;

    const ROLE_ARN: &str = "arn:aws:iam::123456789012:role/ci";

    fn assumer(rule: &Rule) -> StsRoleAssumer {
        let client = mock_client!(aws_sdk_sts, RuleMode::Sequential, &[rule], |conf| {
            conf.retry_config(RetryConfig::disabled())
        });
        StsRoleAssumer::from_client(client)
    }

    #[tokio::test]
    async fn test_assume_role_returns_credentials() {
        let rule = mock!(Client::assume_role)
            .match_requests(|req| {
                req.role_arn() == Some(ROLE_ARN)
                    && req.role_session_name() == Some("credvend-team")
                    && req.duration_seconds() == Some(900)
            })
            .then_output(|| {
                AssumeRoleOutput::builder()
                    .credentials(
                        StsCredentials::builder()
                            .access_key_id("AKID")
                            .secret_access_key("SECRET")
                            .session_token("TOKEN")
                            .expiration(DateTime::from_secs(1_700_000_000))
                            .build()
                            .unwrap(),
                    )
                    .build()
            });

        let creds = assumer(&rule)
            .assume_role(ROLE_ARN, "credvend-team", 900)
            .await
            .unwrap();

        assert_eq!(creds.access_key_id, "AKID");
        assert_eq!(creds.secret_access_key, "SECRET");
        assert_eq!(creds.session_token, "TOKEN");
        assert_eq!(creds.expiration, DateTime::from_secs(1_700_000_000));
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_assume_role_without_credentials_fails() {
        let rule = mock!(Client::assume_role).then_output(|| AssumeRoleOutput::builder().build());

        let err = assumer(&rule)
            .assume_role(ROLE_ARN, "credvend-team", 3600)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "AWS STS returned no credentials");
    }
}
