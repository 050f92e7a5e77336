//! Comment API handlers scoped under a listing's slug.

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::comment::CommentId;
use crate::domain::views::CommentView;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{Auth, MaybeAuth};
use crate::inbound::http::state::HttpState;

/// Comment creation body for `POST /api/items/{slug}/comments`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    pub body: String,
}

/// All comments on a listing, newest first.
#[utoipa::path(
    get,
    path = "/api/items/{slug}/comments",
    params(("slug" = String, Path, description = "Listing slug")),
    responses(
        (status = 200, description = "Comments, newest first", body = [CommentView]),
        (status = 404, description = "No such listing", body = Error)
    ),
    tags = ["comments"],
    operation_id = "listComments",
    security([])
)]
#[get("/items/{slug}/comments")]
pub async fn list_comments(
    auth: MaybeAuth,
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<web::Json<Vec<CommentView>>> {
    let views = state.comments_query.list_comments(&slug, auth.0).await?;
    Ok(web::Json(views))
}

/// Attach a comment to the addressed listing.
#[utoipa::path(
    post,
    path = "/api/items/{slug}/comments",
    params(("slug" = String, Path, description = "Listing slug")),
    request_body = AddCommentRequest,
    responses(
        (status = 200, description = "Comment posted", body = CommentView),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "No such listing", body = Error)
    ),
    tags = ["comments"],
    operation_id = "addComment"
)]
#[post("/items/{slug}/comments")]
pub async fn add_comment(
    auth: Auth,
    state: web::Data<HttpState>,
    slug: web::Path<String>,
    payload: web::Json<AddCommentRequest>,
) -> ApiResult<web::Json<CommentView>> {
    let view = state
        .comments
        .add_comment(auth.0, &slug, &payload.body)
        .await?;
    Ok(web::Json(view))
}

/// Delete a comment from the addressed listing.
#[utoipa::path(
    delete,
    path = "/api/items/{slug}/comments/{id}",
    params(
        ("slug" = String, Path, description = "Listing slug"),
        ("id" = Uuid, Path, description = "Comment identifier")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Caller may not delete this comment", body = Error),
        (status = 404, description = "No such listing or comment", body = Error)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/items/{slug}/comments/{id}")]
pub async fn delete_comment(
    auth: Auth,
    state: web::Data<HttpState>,
    path: web::Path<(String, Uuid)>,
) -> ApiResult<actix_web::HttpResponse> {
    let (slug, id) = path.into_inner();
    state
        .comments
        .delete_comment(auth.0, &slug, CommentId::from(id))
        .await?;
    Ok(actix_web::HttpResponse::NoContent().finish())
}
