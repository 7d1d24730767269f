use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;

use crate::{
    config,
    types::{Token, TokenResponse},
    warning,
};

/// Refresh this many seconds before the access token actually expires.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    pub async fn load() -> Result<Self, String> {
        let content = async_fs::read_to_string(Self::token_path())
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    /// Returns an access token, refreshing and persisting it first when it is
    /// about to expire. A failed refresh hands back the old token and lets the
    /// API reject it.
    pub async fn get_valid_token(&mut self) -> String {
        if self.is_expired() {
            if let Ok(new_token) = self.refresh_token().await {
                self.token = new_token;
                if let Err(e) = self.persist().await {
                    warning!("Refreshed token could not be saved: {}", e);
                }
            }
        }

        self.token.access_token.clone()
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    async fn refresh_token(&self) -> Result<Token, String> {
        let client_id = config::spotify_client_id();
        let client = Client::new();
        let res = client
            .post(config::spotify_apitoken_url())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.token.refresh_token.as_str()),
                ("client_id", client_id.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?;

        let response: TokenResponse = res.json().await.map_err(|e| e.to_string())?;
        Ok(self.renewed(response))
    }

    /// Spotify may omit the refresh token and scope on refresh; keep the
    /// current ones in that case.
    fn renewed(&self, response: TokenResponse) -> Token {
        Token {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .unwrap_or_else(|| self.token.refresh_token.clone()),
            scope: response.scope.unwrap_or_else(|| self.token.scope.clone()),
            expires_in: response.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        }
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}
