pub mod issue;
pub mod lambda;
pub mod render;

pub use issue::IssueCommand;
pub use lambda::LambdaCommand;
pub use render::RenderCommand;

use crate::aws::{self, secrets::SecretsManagerWriter, sts::StsRoleAssumer};
use crate::config::HandlerConfig;
use crate::handler::Issuer;

/// Build an issuer talking to STS and Secrets Manager
pub(crate) async fn aws_issuer(
    config: &HandlerConfig,
) -> Issuer<StsRoleAssumer, SecretsManagerWriter> {
    let sdk_config = aws::load_sdk_config(config.region.as_deref()).await;
    Issuer::new(
        StsRoleAssumer::new(&sdk_config),
        SecretsManagerWriter::new(&sdk_config),
        config.secret_path_template.clone(),
    )
}
