//! Account API handlers: registration, login, and the caller's own
//! profile.

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{ProfileUpdate, RegisterAccount};
use crate::domain::{Email, Error, ImageUrl, LoginCredentials, LoginValidationError, Password, Username};
use crate::domain::views::AuthView;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Auth;
use crate::inbound::http::error::field_error;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/users`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl TryFrom<RegisterRequest> for RegisterAccount {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: Username::new(value.username).map_err(|e| field_error("username", e))?,
            email: Email::new(value.email).map_err(|e| field_error("email", e))?,
            password: Password::new(&value.password).map_err(|e| field_error("password", e))?,
        })
    }
}

/// Login request body for `POST /api/users/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn map_login_validation(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => field_error("email", err),
        LoginValidationError::EmptyPassword => field_error("password", err),
    }
}

/// Partial profile update body for `PUT /api/user`. Omitted fields keep
/// their prior value.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl TryFrom<UpdateProfileRequest> for ProfileUpdate {
    type Error = Error;

    fn try_from(value: UpdateProfileRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: value
                .username
                .map(Username::new)
                .transpose()
                .map_err(|e| field_error("username", e))?,
            email: value
                .email
                .map(Email::new)
                .transpose()
                .map_err(|e| field_error("email", e))?,
            password: value
                .password
                .as_deref()
                .map(Password::new)
                .transpose()
                .map_err(|e| field_error("password", e))?,
            bio: value.bio,
            image: value
                .image
                .map(ImageUrl::new)
                .transpose()
                .map_err(|e| field_error("image", e))?,
        })
    }
}

/// Create an account and return its projection with a fresh bearer token.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = AuthView),
        (status = 400, description = "Validation failed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<AuthView>> {
    let request = RegisterAccount::try_from(payload.into_inner())?;
    let view = state.accounts.register(request).await?;
    Ok(web::Json(view))
}

/// Authenticate and return the account projection with a fresh bearer
/// token.
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthView),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Too many attempts", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthView>> {
    let payload = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_login_validation)?;
    let view = state.login.login(&credentials).await?;
    Ok(web::Json(view))
}

/// Project the caller's own account, minting a fresh token.
#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "Current account", body = AuthView),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "currentUser"
)]
#[get("/user")]
pub async fn current_user(
    auth: Auth,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<AuthView>> {
    let view = state.accounts_query.current_user(auth.0).await?;
    Ok(web::Json(view))
}

/// Update the caller's own profile.
#[utoipa::path(
    put,
    path = "/api/user",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = AuthView),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "updateProfile"
)]
#[put("/user")]
pub async fn update_profile(
    auth: Auth,
    state: web::Data<HttpState>,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<AuthView>> {
    let update = ProfileUpdate::try_from(payload.into_inner())?;
    let view = state.accounts.update_profile(auth.0, update).await?;
    Ok(web::Json(view))
}
