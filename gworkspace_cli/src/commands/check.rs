use gworkspace_core::auth::token::{now_ms, TokenSet};
use gworkspace_core::GoogleAuthManager;
use owo_colors::OwoColorize;
use serde_json::{json, Value};
use tracing::debug;

use crate::cli::Cli;
use crate::commands::{auth_config, Result};
use crate::output::{format_output, OutputData};

/// Load credentials and token the way the server does, and force a usable
/// access token (refreshing and persisting it if needed).
pub async fn run(cli: &Cli) -> Result<()> {
    let config = auth_config(cli);
    let auth = GoogleAuthManager::new(config.clone());
    let client = auth.get_client().await?;
    let before = client.tokens().await;
    client.access_token().await?;
    let after = client.tokens().await;
    let refreshed = before.access_token != after.access_token;
    debug!("token check complete, refreshed={}", refreshed);

    if matches!(cli.output, crate::cli::OutputFormat::Pretty) {
        println!("{} {}", "✓".green().bold(), "Token is valid".bold());
        if refreshed {
            println!("  {}", "Access token was refreshed and saved".dimmed());
        }
    }
    format_output(
        &OutputData::TokenStatus(status(&config.token_path.display().to_string(), &after, refreshed)),
        &cli.output,
    )
}

fn status(token_path: &str, tokens: &TokenSet, refreshed: bool) -> Value {
    json!({
        "token_file": token_path,
        "expires": describe_expiry(tokens.expiry_date, now_ms()),
        "refresh_token": tokens.refresh_token.as_deref().map_or(false, |t| !t.is_empty()),
        "scope": tokens.scope,
        "refreshed": refreshed,
    })
}

fn describe_expiry(expiry_ms: Option<i64>, now: i64) -> String {
    let Some(expiry) = expiry_ms else {
        return "no expiry recorded".to_string();
    };
    let at = chrono::DateTime::from_timestamp_millis(expiry)
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|| expiry.to_string());
    let minutes = expiry.saturating_sub(now) / 60_000;
    if minutes >= 0 {
        format!("{} (in {} min)", at, minutes)
    } else {
        format!("{} ({} min ago)", at, -minutes)
    }
}
