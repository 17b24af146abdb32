use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::{self, Team};
use crate::constants;
use crate::secret_path::{SecretPath, TemplateError};

#[derive(Debug, Clone, Args)]
pub struct RenderCommand {
    #[arg(short = 'c', long, help = "Path to the team configuration (JSON)")]
    pub config: PathBuf,

    #[arg(
        short = 't',
        long,
        help = "Secret path template (defaults to SECRETS_MANAGER_PATH or /concourse/{{.Team}}/{{.Account}})"
    )]
    pub template: Option<String>,
}

impl RenderCommand {
    pub async fn execute(self) -> Result<()> {
        let team = config::load_team(&self.config)
            .await
            .context("Failed to load team configuration")?;
        let template = self
            .template
            .unwrap_or_else(constants::secret_path_template);

        for line in render_paths(&team, &template).context("Failed to render secret paths")? {
            println!("{line}");
        }
        Ok(())
    }
}

fn render_paths(team: &Team, template: &str) -> Result<Vec<String>, TemplateError> {
    team.accounts
        .iter()
        .map(|account| {
            let path = SecretPath::new(&team.name, &account.name, template).render()?;
            Ok(format!(
                "{}\t{}\t{}s\t{}",
                account.name, account.role_arn, account.duration, path
            ))
        })
        .collect()
}
