//! Installed-app OAuth sign-in through a loopback redirect.

use std::collections::HashMap;
use std::path::Path;

use chrono::{Duration, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, SheetsError};
use crate::session::request_token;
use crate::token::AuthorizedUserToken;

const SUCCESS_PAGE: &str = "The authentication flow has completed. You may close this window.";
const FAILURE_PAGE: &str = "The authentication flow failed. Check the terminal for details.";

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// OAuth client registration from the downloaded client secrets file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ClientSecretsFile = serde_json::from_str(json)?;
        file.installed.or(file.web).ok_or_else(|| {
            SheetsError::Config(
                "client secrets must contain an \"installed\" or \"web\" section".to_string(),
            )
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SheetsError::Config(format!("cannot read client secrets {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }
}

/// Desktop sign-in: the user approves access in a browser, which redirects
/// back to a one-shot listener on the loopback interface.
pub struct InstalledAppFlow {
    http: Client,
    secrets: ClientSecrets,
    scopes: Vec<String>,
}

impl InstalledAppFlow {
    pub fn new(secrets: ClientSecrets, scopes: Vec<String>) -> Self {
        Self {
            http: Client::new(),
            secrets,
            scopes,
        }
    }

    pub fn from_client_secrets_file(path: &Path, scopes: Vec<String>) -> Result<Self> {
        Ok(Self::new(ClientSecrets::from_file(path)?, scopes))
    }

    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Consent page URL for the given redirect and anti-forgery state.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<Url> {
        let scope = self.scopes.join(" ");
        Url::parse_with_params(
            &self.secrets.auth_uri,
            &[
                ("response_type", "code"),
                ("client_id", self.secrets.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("scope", scope.as_str()),
                ("state", state),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|e| SheetsError::Config(format!("invalid auth_uri {}: {}", self.secrets.auth_uri, e)))
    }

    /// Run the sign-in. `on_url` receives the consent URL to show the user.
    pub async fn run_local_server<F>(&self, on_url: F) -> Result<AuthorizedUserToken>
    where
        F: FnOnce(&Url),
    {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let redirect_uri = format!("http://127.0.0.1:{}/", listener.local_addr()?.port());
        let state = new_state();

        let url = self.authorization_url(&redirect_uri, &state)?;
        on_url(&url);

        info!("Waiting for OAuth redirect on {}", redirect_uri);
        let code = loop {
            let (stream, peer) = listener.accept().await?;
            debug!("Redirect connection from {}", peer);
            if let Some(code) = handle_redirect(stream, &state).await? {
                break code;
            }
        };

        self.exchange_code(&code, &redirect_uri).await
    }

    /// Trade an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<AuthorizedUserToken> {
        let response = request_token(
            &self.http,
            &self.secrets.token_uri,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.secrets.client_id.as_str()),
                ("client_secret", self.secrets.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
            ],
        )
        .await?;

        info!("Authorization code exchanged");

        Ok(AuthorizedUserToken {
            token: response.access_token,
            refresh_token: response.refresh_token,
            token_uri: self.secrets.token_uri.clone(),
            client_id: self.secrets.client_id.clone(),
            client_secret: self.secrets.client_secret.clone(),
            scopes: response
                .scope
                .map(|s| s.split_whitespace().map(String::from).collect())
                .unwrap_or_else(|| self.scopes.clone()),
            expiry: response.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
        })
    }
}

/// Answer one browser request. Returns the code once the real redirect arrives;
/// stray requests (favicon and the like) get a 404 and `None`.
async fn handle_redirect(stream: TcpStream, state: &str) -> Result<Option<String>> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).await? == 0 || header.trim_end().is_empty() {
            break;
        }
    }

    let outcome = parse_redirect(&request_line, state);
    let (status, body) = match &outcome {
        Ok(Some(_)) => ("200 OK", SUCCESS_PAGE),
        Ok(None) => ("404 Not Found", ""),
        Err(_) => ("400 Bad Request", FAILURE_PAGE),
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).await?;
    let _ = stream.shutdown().await;

    outcome
}

/// Pull the authorization code out of a redirect request line.
fn parse_redirect(request_line: &str, expected_state: &str) -> Result<Option<String>> {
    let target = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| SheetsError::OAuth(format!("malformed redirect request {:?}", request_line.trim())))?;
    let url = Url::parse(&format!("http://127.0.0.1{}", target))
        .map_err(|e| SheetsError::OAuth(format!("malformed redirect target {:?}: {}", target, e)))?;
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    if let Some(error) = params.get("error") {
        return Err(SheetsError::OAuth(format!("authorization denied: {}", error)));
    }

    let Some(code) = params.get("code") else {
        return Ok(None);
    };

    if params.get("state").map(String::as_str) != Some(expected_state) {
        return Err(SheetsError::OAuth("state mismatch in redirect".to_string()));
    }

    Ok(Some(code.clone()))
}

/// Unguessable anti-forgery value echoed back on the redirect.
fn new_state() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;
    use crate::SPREADSHEETS_SCOPE;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_state_is_random_hex() {
        let first = new_state();
        let second = new_state();

        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    fn secrets(token_uri: &str) -> ClientSecrets {
        ClientSecrets {
            client_id: "id.apps.googleusercontent.com".to_string(),
            client_secret: "shh".to_string(),
            auth_uri: default_auth_uri(),
            token_uri: token_uri.to_string(),
        }
    }

    #[test]
    fn test_client_secrets_installed_section() {
        let json = r#"{"installed":{"client_id":"abc","client_secret":"xyz","redirect_uris":["http://localhost"]}}"#;
        let parsed = ClientSecrets::from_json(json).unwrap();

        assert_eq!(parsed.client_id, "abc");
        assert_eq!(parsed.token_uri, "https://oauth2.googleapis.com/token");
    }

    #[test]
    fn test_client_secrets_without_section() {
        let err = ClientSecrets::from_json(r#"{"other":{}}"#).unwrap_err();
        assert!(matches!(err, SheetsError::Config(_)));
    }

    #[test]
    fn test_authorization_url() {
        let flow = InstalledAppFlow::new(
            secrets("https://oauth2.googleapis.com/token"),
            vec![SPREADSHEETS_SCOPE.to_string()],
        );
        let url = flow.authorization_url("http://127.0.0.1:5000/", "st4te").unwrap();
        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert_eq!(params["client_id"], "id.apps.googleusercontent.com");
        assert_eq!(params["redirect_uri"], "http://127.0.0.1:5000/");
        assert_eq!(params["scope"], SPREADSHEETS_SCOPE);
        assert_eq!(params["state"], "st4te");
        assert_eq!(params["access_type"], "offline");
    }

    #[test]
    fn test_parse_redirect() {
        assert_eq!(
            parse_redirect("GET /?state=s1&code=4%2F0Ab HTTP/1.1\r\n", "s1").unwrap(),
            Some("4/0Ab".to_string())
        );
        assert_eq!(parse_redirect("GET /favicon.ico HTTP/1.1\r\n", "s1").unwrap(), None);
        assert!(matches!(
            parse_redirect("GET /?state=other&code=x HTTP/1.1\r\n", "s1"),
            Err(SheetsError::OAuth(_))
        ));
        assert!(matches!(
            parse_redirect("GET /?error=access_denied HTTP/1.1\r\n", "s1"),
            Err(SheetsError::OAuth(_))
        ));
    }

    #[tokio::test]
    async fn test_run_local_server_exchanges_code() {
        let (token_base, token_server) = serve_once(
            200,
            r#"{"access_token":"ya29.new","expires_in":3599,"refresh_token":"1//r","scope":"https://www.googleapis.com/auth/spreadsheets","token_type":"Bearer"}"#,
        )
        .await;
        let http = Client::builder().no_proxy().build().unwrap();
        let flow = InstalledAppFlow::new(
            secrets(&format!("{}/token", token_base)),
            vec![SPREADSHEETS_SCOPE.to_string()],
        )
        .with_client(http.clone());

        let token = flow
            .run_local_server(move |url| {
                let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
                let redirect = format!(
                    "{}?state={}&code=4%2Fabc",
                    params["redirect_uri"], params["state"]
                );
                tokio::spawn(async move {
                    let _ = http.get(redirect).send().await;
                });
            })
            .await
            .unwrap();

        assert_eq!(token.token, "ya29.new");
        assert_eq!(token.refresh_token.as_deref(), Some("1//r"));
        assert_eq!(token.scopes, vec![SPREADSHEETS_SCOPE.to_string()]);
        assert!(token.expiry.is_some());

        let request = token_server.await.unwrap();
        assert!(request.request_line.starts_with("POST /token"));
        assert!(request.body.contains("grant_type=authorization_code"));
        assert!(request.body.contains("code=4%2Fabc"));
    }
}
