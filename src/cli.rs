use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::commands::{IssueCommand, LambdaCommand, RenderCommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "credvend", version, about = "Vend temporary AWS credentials for team accounts", long_about = None, arg_required_else_help = false)]
pub struct Cli {
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Run as an AWS Lambda function (default)")]
    Lambda(LambdaCommand),
    #[command(about = "Issue credentials for a team configuration file once")]
    Issue(IssueCommand),
    #[command(about = "Print the secret paths a team configuration renders to")]
    Render(RenderCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let command = self.command.unwrap_or(Commands::Lambda(LambdaCommand {}));

        match command {
            Commands::Lambda(cmd) => cmd.execute().await,
            Commands::Issue(cmd) => cmd.execute().await,
            Commands::Render(cmd) => cmd.execute().await,
        }
    }
}
