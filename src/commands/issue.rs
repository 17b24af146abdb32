use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::config::{self, HandlerConfig};

#[derive(Debug, Clone, Args)]
pub struct IssueCommand {
    #[arg(short = 'c', long, help = "Path to the team configuration (JSON)")]
    pub config: PathBuf,

    #[arg(short = 'a', long, help = "Only issue credentials for this account")]
    pub account: Option<String>,
}

impl IssueCommand {
    pub async fn execute(self) -> Result<()> {
        let handler_config = HandlerConfig::from_env().context("Invalid handler configuration")?;
        let team = config::load_team(&self.config)
            .await
            .context("Failed to load team configuration")?;

        info!("Issuing credentials for team: {}", team.name);

        let issuer = super::aws_issuer(&handler_config).await;
        let report = match self.account.as_deref() {
            Some(account) => issuer.issue_account(&team, account).await?,
            None => issuer.issue_team(&team).await?,
        };

        for issued in &report.issued {
            println!(
                "{}: credentials written to {} (expires {})",
                issued.account, issued.secret_path, issued.expiration
            );
        }
        for failed in &report.failed {
            eprintln!("{}: {}", failed.account, failed.error);
        }

        report.into_result()?;
        Ok(())
    }
}
