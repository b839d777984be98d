use std::env;
use std::io::{ self, BufRead, Write };

use anyhow::Context;
use oauth2::{
    basic::BasicClient,
    AuthType,
    AuthUrl,
    AuthorizationCode,
    ClientId,
    ClientSecret,
    CsrfToken,
    RedirectUrl,
    RefreshToken,
    RequestTokenError,
    Scope,
    TokenResponse,
    TokenUrl,
};
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

pub const SANDBOX_BASE: &str = "https://sandbox-api.dexcom.com";

#[derive(Debug, Error)]
pub enum DexcomError {
    #[error("Authorization failed: {0}")] Authorization(String),

    #[error("Token exchange failed: {0}")] Exchange(String),

    #[error("Token endpoint returned an unusable response: {0}")] MalformedResponse(String),

    #[error("Alerts request failed with status {status}: {body}")] Resource {
        status: u16,
        body: String,
    },

    #[error("Transport error: {0}")] Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct DexcomConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub api_base: String,
}

impl DexcomConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy
            ::from_filename(".env.local")
            .or_else(|_| dotenvy::dotenv())
            .ok();

        Ok(Self {
            client_id: env::var("DEXCOM_CLIENT_ID").context("DEXCOM_CLIENT_ID must be set")?,
            client_secret: env
                ::var("DEXCOM_CLIENT_SECRET")
                .context("DEXCOM_CLIENT_SECRET must be set")?,
            redirect_uri: env
                ::var("DEXCOM_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:5555/callback".to_string()),
            api_base: env::var("DEXCOM_API_BASE").unwrap_or_else(|_| SANDBOX_BASE.to_string()),
        })
    }

    fn authorize_endpoint(&self) -> String {
        format!("{}/v2/oauth2/login", self.api_base)
    }

    fn token_endpoint(&self) -> String {
        format!("{}/v2/oauth2/token", self.api_base)
    }

    fn alerts_endpoint(&self) -> String {
        format!("{}/v3/users/self/alerts", self.api_base)
    }
}

/// Suspension point for the interactive consent step: present the
/// authorization URL, return the redirect URL the browser landed on.
pub trait CodePrompt {
    fn capture_redirect(&self, authorize_url: &str) -> Result<String, DexcomError>;
}

/// Interactive prompt on stdin. No timeout on this step.
pub struct StdinPrompt;

impl CodePrompt for StdinPrompt {
    fn capture_redirect(&self, authorize_url: &str) -> Result<String, DexcomError> {
        println!("Open this URL in a browser and complete the consent flow:\n");
        println!("  {}\n", authorize_url);
        print!("Paste the full redirect URL here: ");
        io::stdout()
            .flush()
            .map_err(|e| DexcomError::Authorization(format!("prompt failed: {}", e)))?;

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| DexcomError::Authorization(format!("prompt failed: {}", e)))?;

        let line = line.trim();
        if line.is_empty() {
            return Err(DexcomError::Authorization("authorization was aborted".to_string()));
        }

        Ok(line.to_string())
    }
}

pub struct DexcomClient {
    http: reqwest::Client,
    oauth: BasicClient,
    alerts_url: String,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl DexcomClient {
    pub fn new(config: &DexcomConfig) -> Result<Self, anyhow::Error> {
        let oauth = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
            AuthUrl::new(config.authorize_endpoint())?,
            Some(TokenUrl::new(config.token_endpoint())?)
        )
            // Dexcom wants client credentials in the form body, not
            // HTTP basic auth.
            .set_auth_type(AuthType::RequestBody)
            .set_redirect_uri(RedirectUrl::new(config.redirect_uri.clone())?);

        Ok(Self {
            http: reqwest::Client::new(),
            oauth,
            alerts_url: config.alerts_endpoint(),
            access_token: None,
            refresh_token: None,
        })
    }

    /// Seed the client with a refresh token obtained out-of-band,
    /// skipping the interactive consent flow.
    pub fn with_refresh_token(mut self, refresh_token: String) -> Self {
        self.refresh_token = Some(refresh_token);
        self
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn authorize_url(&self) -> String {
        let (url, _csrf_token) = self.oauth
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("offline_access".to_string()))
            .url();

        url.to_string()
    }

    /// Pulls the single-use `code` parameter out of a captured redirect
    /// URL.
    pub fn extract_code(redirect_url: &str) -> Result<String, DexcomError> {
        let url = Url::parse(redirect_url).map_err(|e|
            DexcomError::Authorization(format!("invalid redirect URL: {}", e))
        )?;

        url.query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned())
            .filter(|code| !code.is_empty())
            .ok_or_else(|| {
                DexcomError::Authorization(
                    "redirect URL carries no authorization code".to_string()
                )
            })
    }

    /// Runs the interactive consent flow end to end: present the
    /// authorization URL, capture the redirect, exchange the code.
    pub async fn authorize<P: CodePrompt>(&mut self, prompt: &P) -> Result<(), DexcomError> {
        let authorize_url = self.authorize_url();
        let redirect_url = prompt.capture_redirect(&authorize_url)?;
        let code = Self::extract_code(&redirect_url)?;

        self.exchange_code(code).await
    }

    pub async fn exchange_code(&mut self, code: String) -> Result<(), DexcomError> {
        let token = self.oauth
            .exchange_code(AuthorizationCode::new(code))
            .request_async(oauth2::reqwest::async_http_client).await
            .map_err(|e| {
                match e {
                    RequestTokenError::Parse(err, _) => DexcomError::MalformedResponse(err.to_string()),
                    other => DexcomError::Exchange(other.to_string()),
                }
            })?;

        let refresh_token = token
            .refresh_token()
            .ok_or_else(|| {
                DexcomError::MalformedResponse("no refresh_token in token response".to_string())
            })?;

        self.access_token = Some(token.access_token().secret().clone());
        self.refresh_token = Some(refresh_token.secret().clone());

        tracing::info!("Exchanged authorization code for tokens");

        Ok(())
    }

    /// Mints a new access token from the stored refresh token. A
    /// rotated refresh token is adopted when the provider returns one.
    pub async fn refresh(&mut self) -> Result<(), DexcomError> {
        let refresh_token = self.refresh_token
            .clone()
            .ok_or_else(|| DexcomError::Authorization("no refresh token held".to_string()))?;

        let token = self.oauth
            .exchange_refresh_token(&RefreshToken::new(refresh_token))
            .request_async(oauth2::reqwest::async_http_client).await
            .map_err(|e| {
                match e {
                    RequestTokenError::Parse(err, _) => DexcomError::MalformedResponse(err.to_string()),
                    other => DexcomError::Exchange(other.to_string()),
                }
            })?;

        self.access_token = Some(token.access_token().secret().clone());
        if let Some(rotated) = token.refresh_token() {
            self.refresh_token = Some(rotated.secret().clone());
        }

        tracing::info!("Refreshed access token");

        Ok(())
    }

    async fn get_alerts(&self) -> Result<reqwest::Response, DexcomError> {
        let access_token = self.access_token
            .as_deref()
            .ok_or_else(|| DexcomError::Authorization("no access token held".to_string()))?;

        let response = self.http.get(&self.alerts_url).bearer_auth(access_token).send().await?;

        Ok(response)
    }

    /// Fetches alerts with the stored access token. A 401 means the
    /// token expired: refresh once and retry once. Any other failure,
    /// including a 401 on the retry, surfaces immediately.
    pub async fn fetch_alerts(&mut self) -> Result<serde_json::Value, DexcomError> {
        let mut response = self.get_alerts().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::info!("Access token rejected, refreshing once");
            self.refresh().await?;
            response = self.get_alerts().await?;
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DexcomError::Resource {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<serde_json::Value>().await
            .map_err(|e| DexcomError::MalformedResponse(e.to_string()))
    }
}
