//! Driving port turning raw bearer tokens into caller identities.

use async_trait::async_trait;

use crate::domain::identity::Identity;

/// Domain use-case port for token resolution.
///
/// Resolution is deliberately soft: malformed, tampered, expired, and
/// orphaned tokens (whose account no longer exists) all come back as
/// `None`. Handlers decide whether an anonymous caller is acceptable for
/// the route at hand.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a raw token string to a verified identity, if possible.
    async fn resolve_token(&self, raw: &str) -> Option<Identity>;
}
