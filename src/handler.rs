use aws_smithy_types::date_time::Format;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::aws::{Credentials, RoleAssumer, SecretWriter};
use crate::config::{Account, Team};
use crate::constants::{self, ACCESS_KEY_SUFFIX, SECRET_KEY_SUFFIX, SESSION_TOKEN_SUFFIX};
use crate::secret_path::{SecretPath, TemplateError};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Account '{account}' not found in team '{team}'. Available accounts: {available}")]
    UnknownAccount {
        team: String,
        account: String,
        available: String,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(
        "Failed to issue credentials for {} of {total} account(s) in team '{team}': {}",
        .failed.len(),
        summarize(.failed)
    )]
    Incomplete {
        team: String,
        total: usize,
        failed: Vec<FailedAccount>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedAccount {
    pub account: String,
    pub secret_path: String,
    /// RFC 3339, or "unknown" if the expiration could not be formatted
    pub expiration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedAccount {
    pub account: String,
    pub error: String,
}

/// Outcome of issuing credentials for a team
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueReport {
    pub team: String,
    pub issued: Vec<IssuedAccount>,
    pub failed: Vec<FailedAccount>,
}

fn summarize(failed: &[FailedAccount]) -> String {
    failed
        .iter()
        .map(|f| format!("{} ({})", f.account, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

impl IssueReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Turn a report with failures into an error
    pub fn into_result(self) -> Result<Self, HandlerError> {
        if self.is_complete() {
            return Ok(self);
        }
        Err(HandlerError::Incomplete {
            total: self.issued.len() + self.failed.len(),
            team: self.team,
            failed: self.failed,
        })
    }
}

/// Assumes each account's role and stores the credentials in the secret store
pub struct Issuer<A, W> {
    assumer: A,
    writer: W,
    template: String,
}

impl<A: RoleAssumer, W: SecretWriter> Issuer<A, W> {
    pub fn new(assumer: A, writer: W, template: impl Into<String>) -> Self {
        Self {
            assumer,
            writer,
            template: template.into(),
        }
    }

    /// Issue credentials for every account in the team.
    ///
    /// Accounts are handled in order and a failure on one does not stop the
    /// others. A template that cannot be rendered fails before any role is assumed.
    pub async fn issue_team(&self, team: &Team) -> Result<IssueReport, HandlerError> {
        let paths = team
            .accounts
            .iter()
            .map(|account| SecretPath::new(&team.name, &account.name, &self.template).render())
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Issuing credentials for {} account(s) of team {}",
            team.accounts.len(),
            team.name
        );

        let mut report = IssueReport {
            team: team.name.clone(),
            ..IssueReport::default()
        };

        for (account, path) in team.accounts.iter().zip(paths) {
            match self.issue(&team.name, account, &path).await {
                Ok(issued) => report.issued.push(issued),
                Err(e) => {
                    warn!(
                        "Failed to issue credentials for account {}: {:#}",
                        account.name, e
                    );
                    report.failed.push(FailedAccount {
                        account: account.name.clone(),
                        error: format!("{e:#}"),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Issue credentials for a single named account of the team
    pub async fn issue_account(
        &self,
        team: &Team,
        account_name: &str,
    ) -> Result<IssueReport, HandlerError> {
        let account = team
            .account(account_name)
            .ok_or_else(|| HandlerError::UnknownAccount {
                team: team.name.clone(),
                account: account_name.to_string(),
                available: team.account_names().join(", "),
            })?;

        let single = Team {
            name: team.name.clone(),
            accounts: vec![account.clone()],
        };
        self.issue_team(&single).await
    }

    async fn issue(
        &self,
        team: &str,
        account: &Account,
        path: &str,
    ) -> anyhow::Result<IssuedAccount> {
        info!("Issuing credentials for account {} at {}", account.name, path);

        let credentials = self
            .assumer
            .assume_role(
                &account.role_arn,
                &constants::session_name(team),
                account.duration,
            )
            .await?;

        self.store(path, &credentials).await?;

        Ok(IssuedAccount {
            account: account.name.clone(),
            secret_path: path.to_string(),
            expiration: credentials
                .expiration
                .fmt(Format::DateTime)
                .unwrap_or_else(|_| "unknown".to_string()),
        })
    }

    async fn store(&self, path: &str, credentials: &Credentials) -> anyhow::Result<()> {
        let secrets = [
            (ACCESS_KEY_SUFFIX, &credentials.access_key_id),
            (SECRET_KEY_SUFFIX, &credentials.secret_access_key),
            (SESSION_TOKEN_SUFFIX, &credentials.session_token),
        ];

        for (suffix, value) in secrets {
            self.writer
                .write_secret(&format!("{path}{suffix}"), value)
                .await?;
        }

        Ok(())
    }
}
