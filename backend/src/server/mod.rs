//! Server construction and middleware wiring.

mod state_builders;

pub use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::account_service::AccountPolicy;
use backend::domain::authorization::CommentDeletePolicy;
use backend::domain::consistency::ConsistencyOptions;
use backend::inbound::http::comments::{add_comment, delete_comment, list_comments};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::items::{
    create_item, delete_item, favorite, feed, get_item, list_items, list_tags, unfavorite,
    update_item,
};
use backend::inbound::http::maintenance::compact_favorites;
use backend::inbound::http::profiles::{fetch_profile, follow, unfollow};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{current_user, login, register, update_profile};
#[cfg(debug_assertions)]
use utoipa::OpenApi;

/// Resolved startup settings for wiring the services.
pub struct ServerConfig {
    pub bind_addr: (String, u16),
    pub token_secret: Vec<u8>,
    pub token_ttl: chrono::Duration,
    pub account_policy: AccountPolicy,
    pub consistency: ConsistencyOptions,
    pub comment_policy: CommentDeletePolicy,
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    // `feed` registers before `get_item` so `/items/feed` is not captured
    // by the `{slug}` segment.
    let api = web::scope("/api")
        .service(register)
        .service(login)
        .service(current_user)
        .service(update_profile)
        .service(fetch_profile)
        .service(follow)
        .service(unfollow)
        .service(feed)
        .service(list_items)
        .service(create_item)
        .service(list_comments)
        .service(add_comment)
        .service(delete_comment)
        .service(favorite)
        .service(unfavorite)
        .service(get_item)
        .service(update_item)
        .service(delete_item)
        .service(list_tags)
        .service(compact_favorites);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.route(
        "/api-docs/openapi.json",
        web::get().to(|| async { actix_web::HttpResponse::Ok().json(ApiDoc::openapi()) }),
    );
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server over pre-built application state.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    bind_addr: (String, u16),
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
