//! Access token sources for the Sheets client.

use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, SheetsError};
use crate::token::{AuthorizedUserToken, TokenStore};

/// Supplies a bearer token for each API call.
#[allow(async_fn_in_trait)]
pub trait TokenSource {
    async fn access_token(&mut self) -> Result<String>;
}

/// A fixed access token, for callers that manage auth themselves.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    async fn access_token(&mut self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Response body of the OAuth token endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Post a form to an OAuth token endpoint and decode the answer.
pub(crate) async fn request_token(
    http: &Client,
    token_uri: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse> {
    let response = http.post(token_uri).form(form).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<OAuthErrorBody>(&body)
            .map(|e| match e.error_description {
                Some(description) => format!("{}: {}", e.error, description),
                None => e.error,
            })
            .unwrap_or(body);
        return Err(SheetsError::OAuth(format!("token endpoint returned {}: {}", status, message)));
    }

    Ok(serde_json::from_str(&body)?)
}

/// Token session backed by the token file, refreshing when expired.
pub struct OAuthSession {
    http: Client,
    store: TokenStore,
    token: Option<AuthorizedUserToken>,
}

impl OAuthSession {
    pub fn new(store: TokenStore) -> Self {
        Self::with_client(Client::new(), store)
    }

    pub fn with_client(http: Client, store: TokenStore) -> Self {
        Self {
            http,
            store,
            token: None,
        }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Exchange the refresh token for a new access token and persist it.
    pub async fn refresh(&mut self) -> Result<()> {
        let mut token = match &self.token {
            Some(token) => token.clone(),
            None => self.load()?,
        };
        let refresh_token = token.refresh_token.clone().filter(|t| !t.is_empty()).ok_or_else(|| {
            SheetsError::NotAuthorized("token expired and has no refresh token".to_string())
        })?;

        info!("Refreshing access token");

        let response = request_token(
            &self.http,
            &token.token_uri,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("client_id", token.client_id.as_str()),
                ("client_secret", token.client_secret.as_str()),
            ],
        )
        .await?;

        token.token = response.access_token;
        token.expiry = response.expires_in.map(|secs| Utc::now() + Duration::seconds(secs));
        if let Some(new_refresh) = response.refresh_token {
            token.refresh_token = Some(new_refresh);
        }

        self.store.save(&token)?;
        self.token = Some(token);
        Ok(())
    }

    fn load(&self) -> Result<AuthorizedUserToken> {
        self.store.load()?.ok_or_else(|| {
            SheetsError::NotAuthorized(format!(
                "no token at {}; sign in first",
                self.store.path().display()
            ))
        })
    }
}

impl TokenSource for OAuthSession {
    async fn access_token(&mut self) -> Result<String> {
        if self.token.is_none() {
            self.token = Some(self.load()?);
        }

        if self.token.as_ref().is_some_and(AuthorizedUserToken::is_expired) {
            debug!("Cached access token expired");
            self.refresh().await?;
        }

        self.token
            .as_ref()
            .map(|token| token.token.clone())
            .ok_or_else(|| SheetsError::NotAuthorized("no token loaded".to_string()))
    }
}
