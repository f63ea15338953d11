use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::Router;
use gworkspace_core::auth::token::now_ms;
use gworkspace_core::auth::{load_client_secret, FileTokenStore, TokenSet, TokenStore};
use gworkspace_core::config::{CREDENTIALS_PATH_ENV, TOKEN_PATH_ENV};
use gworkspace_core::oauth::{build_auth_url, google_exchange_code, SCOPES};
use gworkspace_core::utils::{is_error, result_text};
use gworkspace_core::ToolArgs;
use owo_colors::OwoColorize;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, warn};

use crate::cli::Cli;
use crate::commands::{authenticated_manager, CommandError, Result};

const SMOKE_TEST_TOOL: &str = "slides_list_presentations";

/// Hands the authorization code from the callback handler to the setup flow.
#[derive(Clone)]
struct CallbackState {
    auth_url: String,
    code_tx: Arc<Mutex<Option<oneshot::Sender<String>>>>,
}

pub async fn run(cli: &Cli, port: u16, skip_test: bool) -> Result<()> {
    println!("{}", "Google Workspace MCP setup".bold().cyan());
    println!();

    let client = load_client_secret(&cli.credentials).map_err(|e| {
        CommandError::Setup(format!(
            "{}\nDownload an OAuth client (Desktop app) from the Google Cloud console and save it as {}",
            e,
            cli.credentials.display()
        ))
    })?;
    println!(
        "  {} client secret loaded from {}",
        "✓".green(),
        cli.credentials.display()
    );

    let store = FileTokenStore::new(&cli.token);
    if has_existing_token(&store) {
        println!(
            "  {} a token already exists at {}; it will be replaced",
            "!".yellow().bold(),
            cli.token.display()
        );
    }

    let redirect_uri = format!("http://localhost:{}/oauth2callback", port);
    let auth_url = build_auth_url(&client.client_id, &redirect_uri, &SCOPES);

    let code = wait_for_code(port, auth_url).await?;
    debug!("received authorization code");

    let oauth = google_exchange_code(&client.client_id, &client.client_secret, &code, &redirect_uri)
        .await?;
    let tokens = TokenSet::from_oauth(&oauth, now_ms());
    if tokens.refresh_token.is_none() {
        warn!("Google returned no refresh token; the server will stop working when the access token expires");
    }
    store
        .save(&tokens)
        .map_err(|e| CommandError::Setup(e.to_string()))?;
    info!("Saved token to {}", store.location());
    println!(
        "  {} token saved to {}",
        "✓".green(),
        cli.token.display()
    );

    if !skip_test {
        smoke_test(cli).await?;
    }

    println!();
    println!(
        "Point the MCP server at these files with {} and {}.",
        CREDENTIALS_PATH_ENV.yellow(),
        TOKEN_PATH_ENV.yellow()
    );
    Ok(())
}

/// A stored file counts only when it carries a usable access or refresh token.
fn has_existing_token(store: &dyn TokenStore) -> bool {
    store.load().is_ok_and(|t| t.has_any_token())
}

/// Serve the consent redirect and callback until one code arrives.
async fn wait_for_code(port: u16, auth_url: String) -> Result<String> {
    let (code_tx, code_rx) = oneshot::channel();
    let state = CallbackState {
        auth_url: auth_url.clone(),
        code_tx: Arc::new(Mutex::new(Some(code_tx))),
    };
    let app = Router::new()
        .route("/", get(consent_redirect))
        .route("/oauth2callback", get(oauth_callback))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .map_err(|e| CommandError::Setup(format!("cannot listen on port {}: {}", port, e)))?;

    println!();
    println!("Open this URL in your browser to authorize access:");
    println!();
    println!("  {}", auth_url.underline());
    println!();
    println!(
        "{}",
        format!("(or visit http://localhost:{}/ ; waiting for the callback...)", port).dimmed()
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    let code = code_rx.await;
    let _ = shutdown_tx.send(());
    match server.await {
        Ok(Err(e)) => warn!("callback server error: {}", e),
        Err(e) => warn!("callback server task failed: {}", e),
        Ok(Ok(())) => {}
    }

    code.map_err(|_| CommandError::Setup("callback server stopped before a code arrived".into()))
}

async fn consent_redirect(State(state): State<CallbackState>) -> Redirect {
    Redirect::temporary(&state.auth_url)
}

async fn oauth_callback(
    State(state): State<CallbackState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Html<String>) {
    let code = match callback_code(&params) {
        Ok(code) => code,
        Err(message) => {
            warn!("OAuth callback failed: {}", message);
            return (StatusCode::BAD_REQUEST, page("Authorization failed", &message));
        }
    };

    match state.code_tx.lock().await.take() {
        Some(tx) => {
            let _ = tx.send(code);
            (
                StatusCode::OK,
                page(
                    "Authorization complete",
                    "You can close this window and return to the terminal.",
                ),
            )
        }
        None => (
            StatusCode::OK,
            page("Already authorized", "This setup run has already received a code."),
        ),
    }
}

fn callback_code(params: &HashMap<String, String>) -> std::result::Result<String, String> {
    if let Some(error) = params.get("error") {
        return Err(format!("Google returned an error: {}", error));
    }
    match params.get("code") {
        Some(code) if !code.is_empty() => Ok(code.clone()),
        _ => Err("No authorization code in the callback".to_string()),
    }
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><title>{0}</title></head><body><h1>{0}</h1><p>{1}</p></body></html>",
        escape_html(title),
        escape_html(body)
    ))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

async fn smoke_test(cli: &Cli) -> Result<()> {
    let manager = authenticated_manager(cli).await?;
    if manager.descriptor(SMOKE_TEST_TOOL).is_none() {
        debug!("{} not compiled in, skipping API test", SMOKE_TEST_TOOL);
        return Ok(());
    }

    let mut args = ToolArgs::new();
    args.insert("maxResults".to_string(), 1.into());
    let result = manager.handle_tool_call(SMOKE_TEST_TOOL, args).await;
    if is_error(&result) {
        println!(
            "  {} API test failed: {}",
            "✗".red().bold(),
            result_text(&result)
        );
        return Err(CommandError::ToolFailed(SMOKE_TEST_TOOL.to_string()));
    }
    println!("  {} API test passed", "✓".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn existing_token_needs_a_real_token() {
        use gworkspace_core::auth::MemoryTokenStore;

        assert!(!has_existing_token(&MemoryTokenStore::new()));
        assert!(!has_existing_token(&MemoryTokenStore::with_tokens(
            TokenSet::default()
        )));
        assert!(has_existing_token(&MemoryTokenStore::with_tokens(TokenSet {
            refresh_token: Some("r".into()),
            ..Default::default()
        })));
    }

    #[test]
    fn callback_accepts_a_code() {
        assert_eq!(
            callback_code(&params(&[("code", "4/abc"), ("scope", "s")])).unwrap(),
            "4/abc"
        );
    }

    #[test]
    fn callback_rejects_errors_and_missing_codes() {
        let err = callback_code(&params(&[("error", "access_denied")])).unwrap_err();
        assert!(err.contains("access_denied"));
        assert!(callback_code(&params(&[])).is_err());
        assert!(callback_code(&params(&[("code", "")])).is_err());
    }

    #[tokio::test]
    async fn second_callback_does_not_resend() {
        let (tx, rx) = oneshot::channel();
        let state = CallbackState {
            auth_url: "https://example.invalid".into(),
            code_tx: Arc::new(Mutex::new(Some(tx))),
        };
        let (status, _) =
            oauth_callback(State(state.clone()), Query(params(&[("code", "c1")]))).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = oauth_callback(State(state), Query(params(&[("code", "c2")]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rx.await.unwrap(), "c1");
    }

    #[tokio::test]
    async fn denied_callback_is_a_bad_request() {
        let (tx, _rx) = oneshot::channel();
        let state = CallbackState {
            auth_url: String::new(),
            code_tx: Arc::new(Mutex::new(Some(tx))),
        };
        let (status, Html(body)) =
            oauth_callback(State(state), Query(params(&[("error", "access_denied")]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("access_denied"));
    }
}
