//! Operator maintenance endpoints.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Auth;
use crate::inbound::http::state::HttpState;

/// Outcome of a favorites compaction sweep.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompactionReport {
    /// How many dangling favorite references were removed.
    pub pruned: u64,
}

/// Sweep every account's favorites, dropping references to listings that
/// no longer exist. Operator-only.
#[utoipa::path(
    post,
    path = "/api/maintenance/compact-favorites",
    responses(
        (status = 200, description = "Sweep finished", body = CompactionReport),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Caller is not an operator", body = Error)
    ),
    tags = ["maintenance"],
    operation_id = "compactFavorites"
)]
#[post("/maintenance/compact-favorites")]
pub async fn compact_favorites(
    auth: Auth,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<CompactionReport>> {
    let pruned = state.maintenance.compact_favorites(auth.0).await?;
    Ok(web::Json(CompactionReport { pruned }))
}
