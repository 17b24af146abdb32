use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::constants::{self, DEFAULT_SESSION_DURATION_SECONDS};
use crate::secret_path::{self, TemplateError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse team configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid secret path template '{template}': {source}")]
    InvalidTemplate {
        template: String,
        #[source]
        source: TemplateError,
    },
}

/// A team and the accounts it vends credentials for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TeamDocument")]
pub struct Team {
    pub name: String,
    pub accounts: Vec<Account>,
}

/// An AWS account with the role to assume in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "AccountDocument")]
pub struct Account {
    pub name: String,
    pub role_arn: String,
    /// Session duration in seconds, always >= 1
    pub duration: i32,
}

#[derive(Debug, Deserialize)]
struct TeamDocument {
    name: String,
    accounts: Vec<Account>,
}

impl TryFrom<TeamDocument> for Team {
    type Error = String;

    fn try_from(doc: TeamDocument) -> Result<Self, Self::Error> {
        if doc.name.is_empty() {
            return Err("team name must not be empty".to_string());
        }

        Ok(Team {
            name: doc.name,
            accounts: doc.accounts,
        })
    }
}

/// Account as written in the configuration, before defaults are applied
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountDocument {
    name: String,
    role_arn: String,
    #[serde(default)]
    duration: Option<i32>,
}

impl TryFrom<AccountDocument> for Account {
    type Error = String;

    fn try_from(doc: AccountDocument) -> Result<Self, Self::Error> {
        if doc.name.is_empty() {
            return Err("account name must not be empty".to_string());
        }
        if doc.role_arn.is_empty() {
            return Err(format!("roleArn of account '{}' must not be empty", doc.name));
        }

        let duration = match doc.duration {
            None => DEFAULT_SESSION_DURATION_SECONDS,
            Some(d) if d >= 1 => d,
            Some(d) => {
                return Err(format!(
                    "duration of account '{}' must be a positive number of seconds, got {d}",
                    doc.name
                ));
            }
        };

        Ok(Account {
            name: doc.name,
            role_arn: doc.role_arn,
            duration,
        })
    }
}

impl Team {
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Find an account by name
    pub fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.name == name)
    }

    pub fn account_names(&self) -> Vec<&str> {
        self.accounts.iter().map(|a| a.name.as_str()).collect()
    }
}

/// Load a team configuration from a JSON file
pub async fn load_team(path: &Path) -> Result<Team, ConfigError> {
    let contents = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    Team::from_json(&contents)
}

/// Settings of the credential issuer itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub secret_path_template: String,
    pub region: Option<String>,
}

impl HandlerConfig {
    pub fn new(secret_path_template: String, region: Option<String>) -> Result<Self, ConfigError> {
        secret_path::validate_template(&secret_path_template).map_err(|source| {
            ConfigError::InvalidTemplate {
                template: secret_path_template.clone(),
                source,
            }
        })?;

        Ok(Self {
            secret_path_template,
            region,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(
            constants::secret_path_template(),
            constants::region_override(),
        )
    }
}
