mod auth;
mod cache;

pub use auth::TokenManager;
pub use cache::CacheError;
pub use cache::TrackCacheManager;
