use crate::config::AuthConfig;
use crate::error::{DirectoryError, Result};

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        non_empty(&String::from_utf8_lossy(&output.stdout))
    } else {
        tracing::debug!(command, status = %output.status, "token command failed");
        None
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let token = raw.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Resolve the API token at startup, trying in order:
/// 1. Env var named in config
/// 2. Token command from config
///
/// Nothing is written to disk; a rotated token is picked up on the next start.
pub fn load_token(auth: &AuthConfig) -> Result<String> {
    resolve_token(auth, |var| std::env::var(var).ok())
}

fn resolve_token(auth: &AuthConfig, env: impl Fn(&str) -> Option<String>) -> Result<String> {
    if let Some(var) = &auth.token_env {
        if let Some(token) = env(var).as_deref().and_then(non_empty) {
            tracing::debug!(var = %var, "using token from environment");
            return Ok(token);
        }
    }

    if let Some(cmd) = &auth.token_command {
        if let Some(token) = try_cli_token(cmd) {
            tracing::debug!(command = %cmd, "using token from command");
            return Ok(token);
        }
    }

    Err(DirectoryError::Auth(format!(
        "No API token found. Set {} or configure a token_command.",
        auth.token_env.as_deref().unwrap_or("a token env var")
    )))
}
