//! # Spotify Integration Module
//!
//! The remote catalog sporadio files songs into. Submodules:
//!
//! - [`auth`] - OAuth 2.0 PKCE login with a local callback server
//! - [`search`] - resolving an artist/title pair to a track URI
//! - [`playlist`] - creating playlists, adding tracks and reading fill levels
//!
//! ## Retry policy
//!
//! All requests go through [`send_with_retry`]:
//! - `502 Bad Gateway` is retried after 10 seconds, a bounded number of times
//! - `429 Too Many Requests` honours `Retry-After` up to 120 seconds, at most
//!   three times; longer waits or further 429s fail the request with a warning
//!
//! Every function takes the access token as an argument so that callers can
//! refresh it through [`TokenManager`](crate::management::TokenManager)
//! between requests of a long run.

pub mod auth;
pub mod playlist;
pub mod search;

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, header::RETRY_AFTER};
use tokio::time::sleep;

use crate::{error, management::TokenManager, warning};

const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);
const MAX_BAD_GATEWAY_RETRIES: u32 = 5;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Decides whether a response is sent again and after how long. Both 502 and
/// 429 retries are counted and bounded.
#[derive(Debug, Default)]
pub struct RetryPolicy {
    bad_gateways: u32,
    rate_limits: u32,
}

impl RetryPolicy {
    /// `None` means the response is final and handed to the caller.
    pub fn delay_for(&mut self, status: StatusCode, retry_after: Option<&str>) -> Option<Duration> {
        match status {
            StatusCode::BAD_GATEWAY if self.bad_gateways < MAX_BAD_GATEWAY_RETRIES => {
                self.bad_gateways += 1;
                Some(BAD_GATEWAY_DELAY)
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = retry_after
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .unwrap_or(1);

                if retry_after > MAX_RETRY_AFTER_SECS {
                    warning!(
                        "Spotify asks to retry after {} seconds. Try again later.",
                        retry_after
                    );
                    return None;
                }
                if self.rate_limits >= MAX_RATE_LIMIT_RETRIES {
                    warning!("Spotify is still rate limiting after {} retries.", self.rate_limits);
                    return None;
                }
                self.rate_limits += 1;
                Some(Duration::from_secs(retry_after))
            }
            _ => None,
        }
    }
}

/// Sends the request built by `build`, rebuilding and resending it while
/// [`RetryPolicy`] asks for it. Error statuses are returned as errors.
pub async fn send_with_retry<F>(build: F) -> Result<Response, reqwest::Error>
where
    F: Fn() -> RequestBuilder,
{
    let mut policy = RetryPolicy::default();

    loop {
        let response = build().send().await?;
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok());

        match policy.delay_for(response.status(), retry_after) {
            Some(delay) => sleep(delay).await,
            None => return response.error_for_status(),
        }
    }
}

/// Loads the cached token or exits telling the user to log in.
pub async fn load_token_manager() -> TokenManager {
    match TokenManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            error!(
                "Failed to load token. Please run sporadio auth\n Error: {}",
                e
            );
        }
    }
}
