pub mod aws;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod handler;
pub mod secret_path;

pub use config::{Account, HandlerConfig, Team};
pub use handler::{IssueReport, Issuer};
pub use secret_path::{SecretPath, TemplateError};
