use anyhow::{Context, Result, anyhow};
use clap::Args;
use lambda_runtime::{Error as LambdaError, LambdaEvent, run, service_fn};
use tracing::info;

use crate::config::{HandlerConfig, Team};
use crate::handler::IssueReport;

#[derive(Debug, Clone, Args)]
pub struct LambdaCommand {}

impl LambdaCommand {
    pub async fn execute(self) -> Result<()> {
        let config = HandlerConfig::from_env().context("Invalid handler configuration")?;
        info!(
            "Starting Lambda runtime with secret path template {}",
            config.secret_path_template
        );

        let issuer = super::aws_issuer(&config).await;
        let issuer = &issuer;

        run(service_fn(move |event: LambdaEvent<Team>| async move {
            info!(
                "Received event for team {} (request {})",
                event.payload.name, event.context.request_id
            );
            let report: IssueReport = issuer.issue_team(&event.payload).await?.into_result()?;
            Ok::<IssueReport, LambdaError>(report)
        }))
        .await
        .map_err(|e| anyhow!("Lambda runtime failed: {e}"))
    }
}
