//! Application state shared across handlers

use crate::{
    jwt::TokenService,
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::Repositories,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub tokens: TokenService,
    pub login_limiter: RateLimiter,
}

impl AppState {
    pub fn new(repos: Repositories, tokens: TokenService, limiter: RateLimiterConfig) -> Self {
        Self {
            repos,
            tokens,
            login_limiter: RateLimiter::new(limiter),
        }
    }
}
