use std::env;

/// Environment variable holding the secret path template
pub const SECRET_PATH_TEMPLATE_ENV: &str = "SECRETS_MANAGER_PATH";

/// Environment variable overriding the AWS region used for STS and Secrets Manager
pub const REGION_ENV: &str = "REGION";

/// Set by the Lambda runtime for every function invocation
pub const LAMBDA_FUNCTION_NAME_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// Default secret path template
pub const DEFAULT_SECRET_PATH_TEMPLATE: &str = "/concourse/{{.Team}}/{{.Account}}";

/// Default session duration in seconds
pub const DEFAULT_SESSION_DURATION_SECONDS: i32 = 3600;

/// Default AWS region when nothing is configured
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Prefix of the role session name, followed by the team name
pub const SESSION_NAME_PREFIX: &str = "credvend";

/// Suffixes appended to the rendered secret path, one secret per credential field
pub const ACCESS_KEY_SUFFIX: &str = "-access-key";
pub const SECRET_KEY_SUFFIX: &str = "-secret-key";
pub const SESSION_TOKEN_SUFFIX: &str = "-session-token";

/// Get the secret path template
/// Respects SECRETS_MANAGER_PATH environment variable if set and non-empty
pub fn secret_path_template() -> String {
    env::var(SECRET_PATH_TEMPLATE_ENV)
        .ok()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_SECRET_PATH_TEMPLATE.to_string())
}

/// Get the region override, if any
pub fn region_override() -> Option<String> {
    env::var(REGION_ENV).ok().filter(|r| !r.is_empty())
}

/// Whether the process runs inside the Lambda execution environment
pub fn running_in_lambda() -> bool {
    env::var_os(LAMBDA_FUNCTION_NAME_ENV).is_some()
}

/// Role session name used when assuming roles for a team
pub fn session_name(team: &str) -> String {
    format!("{SESSION_NAME_PREFIX}-{team}")
}
