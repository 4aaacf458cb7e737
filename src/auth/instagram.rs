use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::credentials::ClientCredentials;
use super::error::AuthError;
use super::store::AuthStore;
use super::token::{Token, LONG_LIVED_TOKEN_TTL_DAYS};

pub const DEFAULT_AUTHORIZE_URL: &str = "https://api.instagram.com/oauth/authorize";
pub const DEFAULT_ACCESS_TOKEN_URL: &str = "https://api.instagram.com/oauth/access_token";
pub const DEFAULT_LONG_LIVED_TOKEN_URL: &str = "https://graph.instagram.com/access_token";
pub const DEFAULT_REFRESH_TOKEN_URL: &str = "https://graph.instagram.com/refresh_access_token";
pub const DEFAULT_SCOPE: &str = "user_profile,user_media";

/// Result of [`InstagramAuth::authenticate`].
#[derive(Debug, Clone, PartialEq)]
pub enum AuthStep {
    /// No authorization code yet: the user must visit `url` first.
    AuthorizationRequired { url: String },
    /// Code exchanged and long-lived token saved.
    Authenticated { token: Token },
}

/// Result of [`InstagramAuth::refresh_if_needed`].
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Refreshed { token: Token },
    StillValid { token: Token },
}

impl RefreshOutcome {
    pub fn token(&self) -> &Token {
        match self {
            Self::Refreshed { token } | Self::StillValid { token } => token,
        }
    }
}

/// Instagram Basic Display OAuth helper.
///
/// Handles the authorization URL, the code → short-lived → long-lived token
/// exchange, and refreshing long-lived tokens close to expiry. Endpoints can
/// be redirected with the `with_*_url` builders.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use instacrew::auth::{ClientCredentials, FileAuthStore, InstagramAuth};
///
/// # async fn example() -> Result<(), instacrew::auth::AuthError> {
/// let auth = InstagramAuth::new(Arc::new(FileAuthStore::new("credentials")));
/// let creds = ClientCredentials::new("app-id", "app-secret", "https://localhost/callback")
///     .with_code("AQB...");
/// let step = auth.authenticate(&creds).await?;
/// println!("{step:?}");
/// # Ok(())
/// # }
/// ```
pub struct InstagramAuth {
    client: reqwest::Client,
    authorize_url: String,
    access_token_url: String,
    long_lived_token_url: String,
    refresh_token_url: String,
    store: Arc<dyn AuthStore>,
}

impl InstagramAuth {
    pub fn new(store: Arc<dyn AuthStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            access_token_url: DEFAULT_ACCESS_TOKEN_URL.to_string(),
            long_lived_token_url: DEFAULT_LONG_LIVED_TOKEN_URL.to_string(),
            refresh_token_url: DEFAULT_REFRESH_TOKEN_URL.to_string(),
            store,
        }
    }

    pub fn with_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = url.into();
        self
    }

    pub fn with_access_token_url(mut self, url: impl Into<String>) -> Self {
        self.access_token_url = url.into();
        self
    }

    pub fn with_long_lived_token_url(mut self, url: impl Into<String>) -> Self {
        self.long_lived_token_url = url.into();
        self
    }

    pub fn with_refresh_token_url(mut self, url: impl Into<String>) -> Self {
        self.refresh_token_url = url.into();
        self
    }

    pub fn store(&self) -> &Arc<dyn AuthStore> {
        &self.store
    }

    /// URL the user opens to grant access and obtain an authorization code.
    pub fn authorization_url(&self, credentials: &ClientCredentials) -> Result<String, AuthError> {
        let url = reqwest::Url::parse_with_params(
            &self.authorize_url,
            &[
                ("client_id", credentials.client_id.as_str()),
                ("redirect_uri", credentials.redirect_uri.as_str()),
                ("scope", DEFAULT_SCOPE),
                ("response_type", "code"),
            ],
        )
        .map_err(|e| AuthError::InvalidResponse(format!("Invalid authorize URL: {e}")))?;
        Ok(url.to_string())
    }

    /// Save the credentials, then either hand back the authorization URL or
    /// exchange the code for a long-lived token and persist it.
    pub async fn authenticate(&self, credentials: &ClientCredentials) -> Result<AuthStep, AuthError> {
        self.store.save_credentials(credentials)?;

        let Some(code) = credentials.authorization_code() else {
            let url = self.authorization_url(credentials)?;
            tracing::info!("no authorization code supplied; authorization required");
            return Ok(AuthStep::AuthorizationRequired { url });
        };

        let short_lived = self.exchange_code(credentials, code).await?;
        let long_lived = self
            .exchange_for_long_lived_token(&credentials.client_secret, &short_lived.access_token)
            .await?;

        let token = Token::new(
            long_lived.access_token,
            short_lived.user_id,
            expiry_from(Utc::now(), long_lived.expires_in),
        );
        self.store.save_token(&token)?;
        tracing::info!(valid_until = %token.valid_until(), "instagram authentication complete");
        Ok(AuthStep::Authenticated { token })
    }

    /// Exchange an authorization code for a short-lived token.
    pub async fn exchange_code(
        &self,
        credentials: &ClientCredentials,
        code: &str,
    ) -> Result<ShortLivedToken, AuthError> {
        let resp = self
            .client
            .post(&self.access_token_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("redirect_uri", credentials.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        let payload: ShortLivedTokenResponse = resp.json().await?;
        Ok(ShortLivedToken {
            access_token: payload.access_token,
            user_id: payload.user_id.map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
        })
    }

    /// Swap a short-lived token for a long-lived one.
    pub async fn exchange_for_long_lived_token(
        &self,
        client_secret: &str,
        access_token: &str,
    ) -> Result<LongLivedToken, AuthError> {
        let resp = self
            .client
            .get(&self.long_lived_token_url)
            .query(&[
                ("grant_type", "ig_exchange_token"),
                ("client_secret", client_secret),
                ("access_token", access_token),
            ])
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        let payload: LongLivedToken = resp.json().await?;
        Ok(payload)
    }

    /// Return the saved token, or [`AuthError::NotAuthenticated`].
    pub fn require_token(&self) -> Result<Token, AuthError> {
        self.store.load_token()?.ok_or(AuthError::NotAuthenticated)
    }

    /// Refresh the stored token if it expires within the refresh window.
    pub async fn refresh_if_needed(&self) -> Result<RefreshOutcome, AuthError> {
        self.refresh_if_needed_at(Utc::now()).await
    }

    pub async fn refresh_if_needed_at(&self, now: DateTime<Utc>) -> Result<RefreshOutcome, AuthError> {
        let mut token = self.require_token()?;
        if !token.needs_refresh_at(now) {
            tracing::debug!(valid_until = %token.valid_until(), "token still valid");
            return Ok(RefreshOutcome::StillValid { token });
        }
        // refreshing is only meaningful for an app we have credentials for
        if self.store.load_credentials()?.is_none() {
            return Err(AuthError::NotAuthenticated);
        }

        let resp = self
            .client
            .get(&self.refresh_token_url)
            .query(&[
                ("grant_type", "ig_refresh_token"),
                ("access_token", token.access_token.as_str()),
            ])
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        let payload: LongLivedToken = resp.json().await?;

        token.access_token = payload.access_token;
        token.expires_at = Some(expiry_from(now, payload.expires_in));
        self.store.save_token(&token)?;
        tracing::info!(valid_until = %token.valid_until(), "refreshed instagram access token");
        Ok(RefreshOutcome::Refreshed { token })
    }
}

/// Short-lived token returned by the code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLivedToken {
    pub access_token: String,
    pub user_id: Option<String>,
}

/// Long-lived token returned by the exchange and refresh endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LongLivedToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ShortLivedTokenResponse {
    access_token: String,
    #[serde(default)]
    user_id: Option<serde_json::Value>,
}

fn expiry_from(now: DateTime<Utc>, expires_in: Option<i64>) -> DateTime<Utc> {
    match expires_in {
        Some(secs) if secs > 0 => now + Duration::seconds(secs),
        _ => now + Duration::days(LONG_LIVED_TOKEN_TTL_DAYS),
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, AuthError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(AuthError::Rejected {
        status: status.as_u16(),
        body: error_message(&body),
    })
}

/// Pull the human-readable part out of an Instagram error body.
fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.get("error_message")
                .or_else(|| v.pointer("/error/message"))
                .and_then(|m| m.as_str())
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::FileAuthStore;
    use tempfile::TempDir;

    fn auth() -> (TempDir, InstagramAuth) {
        let dir = TempDir::new().unwrap();
        let store = FileAuthStore::new(dir.path().to_path_buf());
        (dir, InstagramAuth::new(Arc::new(store)))
    }

    #[test]
    fn authorization_url_carries_oauth_parameters() {
        let (_dir, auth) = auth();
        let creds = ClientCredentials::new("123", "secret", "https://example.com/cb");
        let url = reqwest::Url::parse(&auth.authorization_url(&creds).unwrap()).unwrap();
        assert_eq!(url.host_str(), Some("api.instagram.com"));
        assert_eq!(url.path(), "/oauth/authorize");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("client_id".into(), "123".into())));
        assert!(pairs.contains(&("redirect_uri".into(), "https://example.com/cb".into())));
        assert!(pairs.contains(&("scope".into(), "user_profile,user_media".into())));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
    }

    #[test]
    fn expiry_defaults_to_sixty_days() {
        let now = Utc::now();
        assert_eq!(expiry_from(now, None), now + Duration::days(60));
        assert_eq!(expiry_from(now, Some(0)), now + Duration::days(60));
        assert_eq!(expiry_from(now, Some(3600)), now + Duration::hours(1));
    }

    #[test]
    fn error_message_prefers_instagram_fields() {
        assert_eq!(
            error_message(r#"{"error_type":"OAuthException","code":400,"error_message":"Invalid code"}"#),
            "Invalid code"
        );
        assert_eq!(
            error_message(r#"{"error":{"message":"Session expired","type":"OAuthException"}}"#),
            "Session expired"
        );
        assert_eq!(error_message(" bad gateway "), "bad gateway");
    }

    #[tokio::test]
    async fn authenticate_without_code_saves_credentials_and_returns_url() {
        let (_dir, auth) = auth();
        let creds = ClientCredentials::new("123", "secret", "https://example.com/cb");
        let step = auth.authenticate(&creds).await.unwrap();
        assert!(matches!(step, AuthStep::AuthorizationRequired { .. }));
        assert_eq!(auth.store().load_credentials().unwrap(), Some(creds));
        assert!(auth.store().load_token().unwrap().is_none());
    }

    #[tokio::test]
    async fn refresh_without_token_is_not_authenticated() {
        let (_dir, auth) = auth();
        let err = auth.refresh_if_needed().await.unwrap_err();
        assert!(matches!(err, AuthError::NotAuthenticated));
    }
}
