//! Operator maintenance tasks.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::authorization::require_admin;
use crate::domain::consistency::ConsistencyMaintainer;
use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::ports::MaintenanceCommand;

/// Maintenance service implementing the operator-only driving port.
pub struct MaintenanceService {
    maintainer: Arc<ConsistencyMaintainer>,
}

impl MaintenanceService {
    /// Construct the service over the shared maintainer.
    #[must_use]
    pub fn new(maintainer: Arc<ConsistencyMaintainer>) -> Self {
        Self { maintainer }
    }
}

#[async_trait]
impl MaintenanceCommand for MaintenanceService {
    async fn compact_favorites(&self, identity: Identity) -> Result<u64, Error> {
        require_admin(identity)?;
        let pruned = self.maintainer.compact_favorites().await?;
        info!(pruned, operator = %identity.user_id(), "favorites compaction requested");
        Ok(pruned)
    }
}
