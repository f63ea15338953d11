use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::auth::AuthClient;
use crate::error::WorkspaceError;

pub const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
pub const SLIDES_PRESENTATIONS_URL: &str = "https://slides.googleapis.com/v1/presentations";
pub const SHEETS_SPREADSHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// One REST call against a Google API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// What commands see of the authenticated client.
#[async_trait]
pub trait GoogleApi: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, WorkspaceError>;
}

/// `GoogleApi` over reqwest with the shared bearer token.
pub struct RestClient {
    http: reqwest::Client,
    auth: Arc<AuthClient>,
}

impl RestClient {
    pub fn new(auth: Arc<AuthClient>) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
        }
    }
}

#[async_trait]
impl GoogleApi for RestClient {
    async fn send(&self, request: ApiRequest) -> Result<Value, WorkspaceError> {
        let token = self.auth.access_token().await?;
        debug!("{:?} {}", request.method, request.url);

        let builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };
        let mut builder = builder.bearer_auth(&token).query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(WorkspaceError::RemoteCall(google_error_message(
                status.as_u16(),
                &text,
            )));
        }
        if text.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Canned-response client that records every request. Backs the tests and
/// offline tool listing. Responses are served in order; once exhausted every
/// call returns `{}`.
#[derive(Default)]
pub struct RecordingApi {
    requests: std::sync::Mutex<Vec<ApiRequest>>,
    responses: std::sync::Mutex<std::collections::VecDeque<Result<Value, String>>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, body: Value) -> Self {
        self.push(Ok(body));
        self
    }

    /// Queue a remote failure with the given message.
    pub fn fail(self, message: &str) -> Self {
        self.push(Err(message.to_string()));
        self
    }

    fn push(&self, reply: Result<Value, String>) {
        if let Ok(mut q) = self.responses.lock() {
            q.push_back(reply);
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GoogleApi for RecordingApi {
    async fn send(&self, request: ApiRequest) -> Result<Value, WorkspaceError> {
        if let Ok(mut r) = self.requests.lock() {
            r.push(request);
        }
        let next = self.responses.lock().ok().and_then(|mut q| q.pop_front());
        match next {
            Some(Ok(v)) => Ok(v),
            Some(Err(msg)) => Err(WorkspaceError::RemoteCall(msg)),
            None => Ok(Value::Object(Default::default())),
        }
    }
}

/// Google error bodies look like `{"error":{"code":404,"message":"..."}}`.
fn google_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status))
}
