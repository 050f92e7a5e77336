//! Listing API handlers: the public index, the personalized feed, CRUD,
//! favorites, and the tag index.

use actix_web::{HttpRequest, delete, get, post, put, web};
use pagination::{Page, page_links};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::Error;
use crate::domain::item::{ItemDraft, ItemUpdate, ItemValidationError};
use crate::domain::ports::ListingFilter;
use crate::domain::views::ItemView;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{Auth, MaybeAuth};
use crate::inbound::http::error::field_error;
use crate::inbound::http::state::HttpState;

/// Query parameters accepted by the listing index and the feed.
///
/// A `cursor` token takes precedence over explicit `limit`/`offset`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub tag: Option<String>,
    pub seller: Option<String>,
    pub favorited: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
    pub cursor: Option<String>,
}

impl ListQuery {
    fn page(&self) -> Result<Page, Error> {
        match self.cursor.as_deref() {
            Some(cursor) => Page::decode(cursor).map_err(|e| field_error("cursor", e)),
            None => Page::from_query(self.limit, self.offset)
                .map_err(|e| field_error("limit", e)),
        }
    }

    fn filter(&self) -> ListingFilter {
        ListingFilter {
            tag: self.tag.clone(),
            seller: self.seller.clone(),
            favorited_by: self.favorited.clone(),
        }
    }
}

/// One window of the listing index with navigation links.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemsPage {
    pub items: Vec<ItemView>,
    /// Total number of matching listings, not just this window.
    pub total: u64,
    /// URL of the next window, absent on the final page.
    pub next: Option<String>,
    /// URL of the previous window, absent on the first page.
    pub prev: Option<String>,
}

impl ItemsPage {
    fn assemble(
        req: &HttpRequest,
        page: &Page,
        window: pagination::Paginated<ItemView>,
    ) -> Self {
        // Reconstruct the request URL for the navigation links; if the
        // host header is unparseable the window still renders, linkless.
        let info = req.connection_info();
        let base = format!("{}://{}{}", info.scheme(), info.host(), req.uri());
        let links = Url::parse(&base)
            .map(|url| page_links(&url, page, window.total))
            .ok();
        let (next, prev) = links.map_or((None, None), |l| (l.next, l.prev));
        Self {
            items: window.items,
            total: window.total,
            next,
            prev,
        }
    }
}

fn map_item_validation(err: ItemValidationError) -> Error {
    let field = match err {
        ItemValidationError::EmptyTitle | ItemValidationError::TitleTooLong { .. } => "title",
        ItemValidationError::EmptyTag | ItemValidationError::TagTooLong { .. } => "tagList",
    };
    field_error(field, err)
}

/// Listing creation body for `POST /api/items`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub title: String,
    pub description: String,
    pub body: String,
    #[serde(default)]
    pub tag_list: Vec<String>,
}

impl TryFrom<CreateItemRequest> for ItemDraft {
    type Error = Error;

    fn try_from(value: CreateItemRequest) -> Result<Self, Self::Error> {
        Self::try_new(value.title, value.description, value.body, value.tag_list)
            .map_err(map_item_validation)
    }
}

/// Partial listing update body for `PUT /api/items/{slug}`. Omitted
/// fields keep their prior value.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub tag_list: Option<Vec<String>>,
}

impl TryFrom<UpdateItemRequest> for ItemUpdate {
    type Error = Error;

    fn try_from(value: UpdateItemRequest) -> Result<Self, Self::Error> {
        Self::try_new(value.title, value.description, value.body, value.tag_list)
            .map_err(map_item_validation)
    }
}

/// Tag index body for `GET /api/tags`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagsResponse {
    pub tags: Vec<String>,
}

/// Page through the public listing index, newest first.
#[utoipa::path(
    get,
    path = "/api/items",
    params(ListQuery),
    responses(
        (status = 200, description = "One window of listings", body = ItemsPage),
        (status = 400, description = "Invalid pagination", body = Error)
    ),
    tags = ["listings"],
    operation_id = "listItems",
    security([])
)]
#[get("/items")]
pub async fn list_items(
    req: HttpRequest,
    auth: MaybeAuth,
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<ItemsPage>> {
    let page = query.page()?;
    let window = state
        .listings_query
        .list_items(&query.filter(), &page, auth.0)
        .await?;
    Ok(web::Json(ItemsPage::assemble(&req, &page, window)))
}

/// Page through listings published by sellers the caller follows.
#[utoipa::path(
    get,
    path = "/api/items/feed",
    params(ListQuery),
    responses(
        (status = 200, description = "One window of followed sellers' listings", body = ItemsPage),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["listings"],
    operation_id = "feed"
)]
#[get("/items/feed")]
pub async fn feed(
    req: HttpRequest,
    auth: Auth,
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<ItemsPage>> {
    let page = query.page()?;
    let window = state.listings_query.feed(auth.0, &page).await?;
    Ok(web::Json(ItemsPage::assemble(&req, &page, window)))
}

/// Project one listing by slug.
#[utoipa::path(
    get,
    path = "/api/items/{slug}",
    params(("slug" = String, Path, description = "Listing slug")),
    responses(
        (status = 200, description = "Listing found", body = ItemView),
        (status = 404, description = "No such listing", body = Error)
    ),
    tags = ["listings"],
    operation_id = "getItem",
    security([])
)]
#[get("/items/{slug}")]
pub async fn get_item(
    auth: MaybeAuth,
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<web::Json<ItemView>> {
    let view = state.listings_query.get_item(&slug, auth.0).await?;
    Ok(web::Json(view))
}

/// Publish a new listing owned by the caller.
#[utoipa::path(
    post,
    path = "/api/items",
    request_body = CreateItemRequest,
    responses(
        (status = 200, description = "Listing created", body = ItemView),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["listings"],
    operation_id = "createItem"
)]
#[post("/items")]
pub async fn create_item(
    auth: Auth,
    state: web::Data<HttpState>,
    payload: web::Json<CreateItemRequest>,
) -> ApiResult<web::Json<ItemView>> {
    let draft = ItemDraft::try_from(payload.into_inner())?;
    let view = state.listings.create_item(auth.0, draft).await?;
    Ok(web::Json(view))
}

/// Edit a listing. Seller-only; the slug never changes.
#[utoipa::path(
    put,
    path = "/api/items/{slug}",
    params(("slug" = String, Path, description = "Listing slug")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Listing updated", body = ItemView),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Caller is not the seller", body = Error),
        (status = 404, description = "No such listing", body = Error)
    ),
    tags = ["listings"],
    operation_id = "updateItem"
)]
#[put("/items/{slug}")]
pub async fn update_item(
    auth: Auth,
    state: web::Data<HttpState>,
    slug: web::Path<String>,
    payload: web::Json<UpdateItemRequest>,
) -> ApiResult<web::Json<ItemView>> {
    let update = ItemUpdate::try_from(payload.into_inner())?;
    let view = state.listings.update_item(auth.0, &slug, update).await?;
    Ok(web::Json(view))
}

/// Delete a listing and its comments. Seller-only.
#[utoipa::path(
    delete,
    path = "/api/items/{slug}",
    params(("slug" = String, Path, description = "Listing slug")),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Caller is not the seller", body = Error),
        (status = 404, description = "No such listing", body = Error)
    ),
    tags = ["listings"],
    operation_id = "deleteItem"
)]
#[delete("/items/{slug}")]
pub async fn delete_item(
    auth: Auth,
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<actix_web::HttpResponse> {
    state.listings.delete_item(auth.0, &slug).await?;
    Ok(actix_web::HttpResponse::NoContent().finish())
}

/// Add the listing to the caller's favorites. Idempotent.
#[utoipa::path(
    post,
    path = "/api/items/{slug}/favorite",
    params(("slug" = String, Path, description = "Listing slug")),
    responses(
        (status = 200, description = "Favorited", body = ItemView),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "No such listing", body = Error)
    ),
    tags = ["listings"],
    operation_id = "favoriteItem"
)]
#[post("/items/{slug}/favorite")]
pub async fn favorite(
    auth: Auth,
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<web::Json<ItemView>> {
    let view = state.engagement.favorite(auth.0, &slug).await?;
    Ok(web::Json(view))
}

/// Remove the listing from the caller's favorites. Idempotent.
#[utoipa::path(
    delete,
    path = "/api/items/{slug}/favorite",
    params(("slug" = String, Path, description = "Listing slug")),
    responses(
        (status = 200, description = "Unfavorited", body = ItemView),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "No such listing", body = Error)
    ),
    tags = ["listings"],
    operation_id = "unfavoriteItem"
)]
#[delete("/items/{slug}/favorite")]
pub async fn unfavorite(
    auth: Auth,
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<web::Json<ItemView>> {
    let view = state.engagement.unfavorite(auth.0, &slug).await?;
    Ok(web::Json(view))
}

/// Every distinct tag in use, sorted.
#[utoipa::path(
    get,
    path = "/api/tags",
    responses(
        (status = 200, description = "Tag index", body = TagsResponse)
    ),
    tags = ["listings"],
    operation_id = "listTags",
    security([])
)]
#[get("/tags")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<TagsResponse>> {
    let tags = state.listings_query.list_tags().await?;
    Ok(web::Json(TagsResponse { tags }))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test as actix_test, web};
    use chrono::{TimeZone, Utc};
    use pagination::Paginated;
    use serde_json::Value;

    use super::*;
    use crate::domain::Identity;
    use crate::domain::user::{Role, UserId};
    use crate::domain::views::ProfileView;
    use crate::inbound::http::test_utils::StateFixture;

    fn item_view(slug: &str) -> ItemView {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap();
        ItemView {
            slug: slug.to_owned(),
            title: "Vintage Camera".to_owned(),
            description: "well loved".to_owned(),
            body: "shutter works".to_owned(),
            tag_list: vec!["cameras".to_owned()],
            created_at: at,
            updated_at: at,
            favorited: false,
            favorites_count: 0,
            seller: ProfileView {
                username: "ada".to_owned(),
                bio: String::new(),
                image: None,
                following: false,
            },
        }
    }

    fn app(
        fixture: StateFixture,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(fixture.build()))
            .service(
                web::scope("/api")
                    .service(feed)
                    .service(list_items)
                    .service(get_item)
                    .service(create_item)
                    .service(update_item)
                    .service(delete_item)
                    .service(favorite)
                    .service(unfavorite)
                    .service(list_tags),
            )
    }

    #[actix_web::test]
    async fn the_index_renders_a_window_with_navigation_links() {
        let mut fixture = StateFixture::new();
        fixture
            .listings_query
            .expect_list_items()
            .withf(|filter, page, viewer| {
                filter.tag.as_deref() == Some("cameras")
                    && page.limit() == 2
                    && page.offset() == 2
                    && viewer.is_none()
            })
            .return_once(|_, _, _| {
                Ok(Paginated::new(vec![item_view("a"), item_view("b")], 10))
            });
        let app = actix_test::init_service(app(fixture)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/items?tag=cameras&limit=2&offset=2")
                .to_request(),
        )
        .await;
        assert!(res.status().is_success());
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["total"].as_u64(), Some(10));
        assert_eq!(value["items"].as_array().map(Vec::len), Some(2));
        let next = value["next"].as_str().unwrap_or_default();
        assert!(next.contains("offset=4"), "next link windows forward: {next}");
        let prev = value["prev"].as_str().unwrap_or_default();
        assert!(prev.contains("offset=0"), "prev link windows back: {prev}");
    }

    #[actix_web::test]
    async fn oversized_limits_are_rejected_before_the_query_runs() {
        let app = actix_test::init_service(app(StateFixture::new())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/items?limit=500")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(res).await;
        assert!(value["details"]["fieldErrors"]["limit"].is_string());
    }

    #[actix_web::test]
    async fn cursors_take_precedence_over_explicit_offsets() {
        let cursor = Page::new(5, 15).map(|p| p.encode()).unwrap();
        let mut fixture = StateFixture::new();
        fixture
            .listings_query
            .expect_list_items()
            .withf(|_, page, _| page.limit() == 5 && page.offset() == 15)
            .return_once(|_, _, _| Ok(Paginated::new(vec![], 0)));
        let app = actix_test::init_service(app(fixture)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/items?limit=1&offset=0&cursor={cursor}"))
                .to_request(),
        )
        .await;
        assert!(res.status().is_success());
    }

    #[actix_web::test]
    async fn the_feed_path_is_not_shadowed_by_the_slug_route() {
        let identity = Identity::new(UserId::random(), Role::User);
        let mut fixture = StateFixture::new();
        fixture.allow_identity(identity);
        fixture
            .listings_query
            .expect_feed()
            .return_once(|_, _| Ok(Paginated::new(vec![item_view("a")], 1)));
        let app = actix_test::init_service(app(fixture)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/items/feed")
                .insert_header(("Authorization", "Token tok"))
                .to_request(),
        )
        .await;
        assert!(res.status().is_success());
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["total"].as_u64(), Some(1));
    }

    #[actix_web::test]
    async fn creating_a_listing_validates_the_draft_first() {
        let identity = Identity::new(UserId::random(), Role::User);
        let mut fixture = StateFixture::new();
        fixture.allow_identity(identity);
        let app = actix_test::init_service(app(fixture)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/items")
                .insert_header(("Authorization", "Token tok"))
                .set_json(&CreateItemRequest {
                    title: "   ".into(),
                    ..CreateItemRequest::default()
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(res).await;
        assert!(value["details"]["fieldErrors"]["title"].is_string());
    }

    #[actix_web::test]
    async fn deleting_a_listing_returns_no_content() {
        let identity = Identity::new(UserId::random(), Role::User);
        let mut fixture = StateFixture::new();
        fixture.allow_identity(identity);
        fixture
            .listings
            .expect_delete_item()
            .withf(|_, slug| slug == "vintage-camera-a1b2c3")
            .return_once(|_, _| Ok(()));
        let app = actix_test::init_service(app(fixture)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/api/items/vintage-camera-a1b2c3")
                .insert_header(("Authorization", "Token tok"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), actix_web::http::StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn favoriting_projects_the_updated_listing() {
        let identity = Identity::new(UserId::random(), Role::User);
        let mut fixture = StateFixture::new();
        fixture.allow_identity(identity);
        fixture.engagement.expect_favorite().return_once(|_, _| {
            let mut view = item_view("a");
            view.favorited = true;
            view.favorites_count = 1;
            Ok(view)
        });
        let app = actix_test::init_service(app(fixture)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/items/a/favorite")
                .insert_header(("Authorization", "Token tok"))
                .to_request(),
        )
        .await;
        assert!(res.status().is_success());
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["favorited"].as_bool(), Some(true));
        assert_eq!(value["favoritesCount"].as_u64(), Some(1));
    }

    #[actix_web::test]
    async fn the_tag_index_is_a_flat_list() {
        let mut fixture = StateFixture::new();
        fixture
            .listings_query
            .expect_list_tags()
            .return_once(|| Ok(vec!["bikes".to_owned(), "cameras".to_owned()]));
        let app = actix_test::init_service(app(fixture)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/tags").to_request(),
        )
        .await;
        assert!(res.status().is_success());
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["tags"][0].as_str(), Some("bikes"));
    }
}
