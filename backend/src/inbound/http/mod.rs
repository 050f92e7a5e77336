//! HTTP inbound adapter exposing the marketplace REST endpoints.
//!
//! Handlers translate JSON payloads into domain calls through the driving
//! ports in [`state::HttpState`] and map domain errors onto status codes
//! via [`error`]. Authentication is a bearer token resolved by the
//! extractors in [`auth`].

pub mod auth;
pub mod comments;
pub mod error;
pub mod health;
pub mod items;
pub mod maintenance;
pub mod profiles;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
