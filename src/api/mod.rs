//! # API Module
//!
//! HTTP endpoints served while `sporadio auth` is running:
//!
//! - [`callback`] - OAuth redirect target; exchanges the authorization code for
//!   a token using the stored PKCE verifier
//! - [`health`] - liveness probe returning the crate version
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use sporadio::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
