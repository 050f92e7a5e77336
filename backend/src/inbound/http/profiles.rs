//! Profile API handlers: public profile reads and follow edges.

use actix_web::{delete, get, post, web};

use crate::domain::Error;
use crate::domain::views::ProfileView;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{Auth, MaybeAuth};
use crate::inbound::http::state::HttpState;

/// Project a public profile from the caller's perspective.
#[utoipa::path(
    get,
    path = "/api/profiles/{username}",
    params(("username" = String, Path, description = "Profile username")),
    responses(
        (status = 200, description = "Profile found", body = ProfileView),
        (status = 404, description = "No such profile", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "fetchProfile",
    security([])
)]
#[get("/profiles/{username}")]
pub async fn fetch_profile(
    auth: MaybeAuth,
    state: web::Data<HttpState>,
    username: web::Path<String>,
) -> ApiResult<web::Json<ProfileView>> {
    let view = state.profiles.fetch_profile(&username, auth.0).await?;
    Ok(web::Json(view))
}

/// Follow the addressed profile. Idempotent.
#[utoipa::path(
    post,
    path = "/api/profiles/{username}/follow",
    params(("username" = String, Path, description = "Profile username")),
    responses(
        (status = 200, description = "Now following", body = ProfileView),
        (status = 400, description = "Cannot follow yourself", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "No such profile", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "followProfile"
)]
#[post("/profiles/{username}/follow")]
pub async fn follow(
    auth: Auth,
    state: web::Data<HttpState>,
    username: web::Path<String>,
) -> ApiResult<web::Json<ProfileView>> {
    let view = state.engagement.follow(auth.0, &username).await?;
    Ok(web::Json(view))
}

/// Unfollow the addressed profile. Idempotent.
#[utoipa::path(
    delete,
    path = "/api/profiles/{username}/follow",
    params(("username" = String, Path, description = "Profile username")),
    responses(
        (status = 200, description = "No longer following", body = ProfileView),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "No such profile", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "unfollowProfile"
)]
#[delete("/profiles/{username}/follow")]
pub async fn unfollow(
    auth: Auth,
    state: web::Data<HttpState>,
    username: web::Path<String>,
) -> ApiResult<web::Json<ProfileView>> {
    let view = state.engagement.unfollow(auth.0, &username).await?;
    Ok(web::Json(view))
}
