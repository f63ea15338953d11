use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WorkspaceError;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Slides, per-file Drive access and Sheets.
pub const SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/presentations",
    "https://www.googleapis.com/auth/drive.file",
    "https://www.googleapis.com/auth/spreadsheets",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
    pub id_token: Option<String>,
}

impl OAuthTokens {
    /// Absolute expiry in epoch milliseconds.
    pub fn expiry_date(&self, now_ms: i64) -> Option<i64> {
        self.expires_in.map(|secs| now_ms + secs * 1000)
    }
}

/// Consent-screen URL for the installed-app code flow. `access_type=offline`
/// together with `prompt=consent` makes Google issue a refresh token every time.
pub fn build_auth_url(client_id: &str, redirect_uri: &str, scopes: &[&str]) -> String {
    let mut url = match url::Url::parse(GOOGLE_AUTH_URL) {
        Ok(u) => u,
        Err(_) => return GOOGLE_AUTH_URL.to_string(),
    };
    url.query_pairs_mut()
        .append_pair("access_type", "offline")
        .append_pair("scope", &scopes.join(" "))
        .append_pair("prompt", "consent")
        .append_pair("response_type", "code")
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri);
    url.to_string()
}

pub async fn google_exchange_code(
    client_id: &str,
    client_secret: &str,
    code: &str,
    redirect_uri: &str,
) -> Result<OAuthTokens, WorkspaceError> {
    let body = [
        ("grant_type", "authorization_code"),
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("code", code),
        ("redirect_uri", redirect_uri),
    ];
    post_token_form(&body, "code exchange failed").await
}

pub async fn google_refresh_token(
    client_id: &str,
    client_secret: Option<&str>,
    refresh_token: &str,
) -> Result<OAuthTokens, WorkspaceError> {
    let mut body = vec![
        ("grant_type", "refresh_token"),
        ("client_id", client_id),
        ("refresh_token", refresh_token),
    ];
    if let Some(cs) = client_secret {
        if !cs.is_empty() {
            body.push(("client_secret", cs));
        }
    }
    post_token_form(&body, "refresh failed").await
}

async fn post_token_form(
    body: &[(&str, &str)],
    failure: &str,
) -> Result<OAuthTokens, WorkspaceError> {
    let resp = reqwest::Client::new()
        .post(GOOGLE_TOKEN_URL)
        .form(body)
        .send()
        .await
        .map_err(WorkspaceError::HttpRequest)?;
    let status = resp.status();
    let v = resp
        .json::<Value>()
        .await
        .map_err(|e| WorkspaceError::Authentication(format!("{}: {}", failure, e)))?;
    if !status.is_success() {
        return Err(WorkspaceError::Authentication(format!("{}: {}", failure, v)));
    }
    parse_token_response(&v)
}

fn parse_token_response(v: &Value) -> Result<OAuthTokens, WorkspaceError> {
    let opt = |key: &str| v.get(key).and_then(|s| s.as_str()).map(|s| s.to_string());
    let access_token = opt("access_token").ok_or_else(|| {
        WorkspaceError::Authentication("token response has no access_token".to_string())
    })?;
    Ok(OAuthTokens {
        access_token,
        refresh_token: opt("refresh_token"),
        expires_in: v.get("expires_in").and_then(|i| i.as_i64()),
        scope: opt("scope"),
        token_type: opt("token_type"),
        id_token: opt("id_token"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_url_requests_offline_consent() {
        let url = build_auth_url("cid", "http://localhost:8000/oauth2callback", &SCOPES);
        let parsed = url::Url::parse(&url).unwrap();
        let pairs: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();
        assert_eq!(pairs["access_type"], "offline");
        assert_eq!(pairs["prompt"], "consent");
        assert_eq!(pairs["client_id"], "cid");
        assert_eq!(pairs["redirect_uri"], "http://localhost:8000/oauth2callback");
        assert!(pairs["scope"].contains("auth/presentations"));
        assert!(pairs["scope"].contains("auth/spreadsheets"));
    }

    #[test]
    fn token_response_parsing() {
        let t = parse_token_response(&json!({
            "access_token": "ya29",
            "expires_in": 3599,
            "scope": "s",
            "token_type": "Bearer"
        }))
        .unwrap();
        assert_eq!(t.access_token, "ya29");
        assert_eq!(t.refresh_token, None);
        assert_eq!(t.expiry_date(1_000), Some(1_000 + 3_599_000));

        assert!(parse_token_response(&json!({"error": "invalid_grant"})).is_err());
    }
}
