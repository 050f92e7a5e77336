//! Bearer-token extractors deriving the caller's identity.
//!
//! Handlers declare either [`Auth`] (the route requires a signed-in
//! caller) or [`MaybeAuth`] (anonymous callers are acceptable). Token
//! resolution is soft: malformed, expired, and orphaned tokens read as
//! anonymous, and [`Auth`] turns anonymous into 401 with the shared
//! access-denied message.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{ACCESS_DENIED, Error, Identity};
use crate::inbound::http::state::HttpState;

/// Accepted authorization schemes, checked in order.
const SCHEMES: [&str; 2] = ["Token ", "Bearer "];

/// Verified identity of the caller. Extraction fails with 401 when no
/// valid token accompanies the request.
#[derive(Debug, Clone, Copy)]
pub struct Auth(pub Identity);

/// Caller identity when present; anonymous requests extract as `None`.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuth(pub Option<Identity>);

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    SCHEMES
        .iter()
        .find_map(|scheme| header.strip_prefix(scheme))
        .map(|token| token.trim().to_owned())
}

async fn resolve(req: HttpRequest) -> Result<Option<Identity>, Error> {
    let Some(token) = bearer_token(&req) else {
        return Ok(None);
    };
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not configured"))?;
    Ok(state.identity.resolve_token(&token).await)
}

impl FromRequest for MaybeAuth {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { Ok(Self(resolve(req).await?)) })
    }
}

impl FromRequest for Auth {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            resolve(req)
                .await?
                .map(Self)
                .ok_or_else(|| Error::unauthorized(ACCESS_DENIED))
        })
    }
}
