use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::oauth::OAuthTokens;

/// Refresh this long before the recorded expiry.
pub const EAGER_REFRESH_WINDOW_MS: i64 = 5 * 60 * 1000;

/// Contents of the token file. Fields we do not know about are kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// Epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenSet {
    pub fn from_oauth(tokens: &OAuthTokens, now_ms: i64) -> Self {
        Self {
            access_token: Some(tokens.access_token.clone()),
            refresh_token: tokens.refresh_token.clone(),
            scope: tokens.scope.clone(),
            token_type: tokens.token_type.clone(),
            id_token: tokens.id_token.clone(),
            expiry_date: tokens.expiry_date(now_ms),
            extra: Map::new(),
        }
    }

    /// Overlay the fields present in `newer` onto `self`.
    pub fn merge(&self, newer: &TokenSet) -> TokenSet {
        let mut out = self.clone();
        macro_rules! take {
            ($($field:ident),*) => {
                $(if newer.$field.is_some() { out.$field = newer.$field.clone(); })*
            };
        }
        take!(access_token, refresh_token, scope, token_type, id_token, expiry_date);
        for (k, v) in &newer.extra {
            out.extra.insert(k.clone(), v.clone());
        }
        out
    }

    /// True when there is no access token, or it expires within the eager window.
    /// A token without a recorded expiry is trusted as-is.
    pub fn needs_refresh(&self, now_ms: i64) -> bool {
        match (&self.access_token, self.expiry_date) {
            (None, _) => true,
            (Some(t), _) if t.is_empty() => true,
            (Some(_), Some(exp)) => exp.saturating_sub(EAGER_REFRESH_WINDOW_MS) <= now_ms,
            (Some(_), None) => false,
        }
    }

    /// True when the set holds a non-empty access or refresh token.
    pub fn has_any_token(&self) -> bool {
        let present = |t: &Option<String>| t.as_deref().is_some_and(|t| !t.is_empty());
        present(&self.access_token) || present(&self.refresh_token)
    }
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let raw = json!({
            "access_token": "a",
            "refresh_token": "r",
            "expiry_date": 1000,
            "refresh_token_expires_in": 604799
        });
        let t: TokenSet = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(t.extra["refresh_token_expires_in"], 604799);
        assert_eq!(serde_json::to_value(&t).unwrap(), raw);
    }

    #[test]
    fn merge_keeps_old_refresh_token() {
        let old = TokenSet {
            access_token: Some("old".into()),
            refresh_token: Some("r".into()),
            scope: Some("s".into()),
            ..Default::default()
        };
        let new = TokenSet {
            access_token: Some("new".into()),
            expiry_date: Some(42),
            ..Default::default()
        };
        let merged = old.merge(&new);
        assert_eq!(merged.access_token.as_deref(), Some("new"));
        assert_eq!(merged.refresh_token.as_deref(), Some("r"));
        assert_eq!(merged.scope.as_deref(), Some("s"));
        assert_eq!(merged.expiry_date, Some(42));
    }

    #[test]
    fn refresh_window() {
        let now = 10_000_000;
        let t = |exp: Option<i64>| TokenSet {
            access_token: Some("a".into()),
            expiry_date: exp,
            ..Default::default()
        };
        assert!(t(Some(now + 60_000)).needs_refresh(now));
        assert!(!t(Some(now + EAGER_REFRESH_WINDOW_MS + 1)).needs_refresh(now));
        assert!(!t(None).needs_refresh(now));
        assert!(TokenSet::default().needs_refresh(now));
        assert!(t(Some(i64::MIN)).needs_refresh(now));
        assert!(t(Some(i64::MIN + 1)).needs_refresh(i64::MIN));
    }

    #[test]
    fn empty_strings_are_not_tokens() {
        assert!(!TokenSet::default().has_any_token());
        let blank = TokenSet {
            access_token: Some(String::new()),
            refresh_token: Some(String::new()),
            ..Default::default()
        };
        assert!(!blank.has_any_token());
        let refresh_only = TokenSet {
            refresh_token: Some("r".into()),
            ..Default::default()
        };
        assert!(refresh_only.has_any_token());
    }
}
