//! Driving port for login use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! infrastructure. HTTP handler tests substitute a mock instead of wiring
//! persistence.

use async_trait::async_trait;

use crate::domain::credentials::LoginCredentials;
use crate::domain::error::Error;
use crate::domain::views::AuthView;

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the account projection with a fresh
    /// bearer token.
    ///
    /// Unknown emails and wrong passwords fail identically; repeated
    /// failures for one account are throttled.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthView, Error>;
}
