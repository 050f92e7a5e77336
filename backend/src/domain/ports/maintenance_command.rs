//! Driving port for operator maintenance tasks.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::identity::Identity;

/// Domain use-case port for maintenance operations. Operator-only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceCommand: Send + Sync {
    /// Sweep every account's favorites set, dropping references to
    /// listings that no longer exist. Returns how many references were
    /// pruned.
    async fn compact_favorites(&self, identity: Identity) -> Result<u64, Error>;
}
