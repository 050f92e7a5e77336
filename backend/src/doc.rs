//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] assembles the specification from the inbound handler
//! annotations and the view schemas. Debug builds serve the document from
//! `/api-docs/openapi.json`; `cargo run --bin openapi-dump` exports it for
//! external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::domain::views::{AuthView, CommentView, ItemView, ProfileView};
use crate::inbound::http::comments::AddCommentRequest;
use crate::inbound::http::items::{
    CreateItemRequest, ItemsPage, TagsResponse, UpdateItemRequest,
};
use crate::inbound::http::maintenance::CompactionReport;
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UpdateProfileRequest};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Signed token issued by POST /api/users and POST /api/users/login. \
                         The `Token` scheme name is accepted as an alias for `Bearer`.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the marketplace REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Jumble marketplace API",
        description = "HTTP interface for accounts, listings, comments, and engagement."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::profiles::fetch_profile,
        crate::inbound::http::profiles::follow,
        crate::inbound::http::profiles::unfollow,
        crate::inbound::http::items::list_items,
        crate::inbound::http::items::feed,
        crate::inbound::http::items::get_item,
        crate::inbound::http::items::create_item,
        crate::inbound::http::items::update_item,
        crate::inbound::http::items::delete_item,
        crate::inbound::http::items::favorite,
        crate::inbound::http::items::unfavorite,
        crate::inbound::http::items::list_tags,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::add_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::maintenance::compact_favorites,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        AuthView,
        ProfileView,
        ItemView,
        CommentView,
        RegisterRequest,
        LoginRequest,
        UpdateProfileRequest,
        CreateItemRequest,
        UpdateItemRequest,
        ItemsPage,
        TagsResponse,
        AddCommentRequest,
        CompactionReport,
    )),
    tags(
        (name = "accounts", description = "Registration, login, and the caller's own profile"),
        (name = "profiles", description = "Public profiles and follow edges"),
        (name = "listings", description = "The listing index, feed, CRUD, favorites, and tags"),
        (name = "comments", description = "Comments attached to listings"),
        (name = "maintenance", description = "Operator-only maintenance tasks"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
