//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define the strongly typed marketplace model (users, listings,
//! comments) together with the services that implement the driving ports.
//! Keep aggregates immutable from the outside and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Validated value types (`Username`, `Email`, `Slug`, `Tag`) and the
//!   aggregates built from them (`User`, `Item`, `Comment`).
//! - `Error` / `ErrorCode`: the API error payload and its stable codes.
//! - View types (`AuthView`, `ProfileView`, `ItemView`, `CommentView`)
//!   rendered for API responses.
//! - Services (`AccountService`, `ListingService`, `CommentService`,
//!   `RelationshipService`, `MaintenanceService`) implementing the driving
//!   ports, plus the `ConsistencyMaintainer` they share.

pub mod account_service;
pub mod authorization;
pub mod comment;
pub mod comment_service;
pub mod consistency;
pub mod credentials;
pub mod error;
pub mod identity;
pub mod item;
pub mod listing_service;
pub mod maintenance_service;
pub mod ports;
pub mod relationship_service;
pub mod slug;
pub mod tokens;
pub mod trace_id;
pub mod user;
pub mod views;

pub use self::account_service::{AccountPolicy, AccountService};
pub use self::authorization::CommentDeletePolicy;
pub use self::comment::{Comment, CommentId, CommentValidationError};
pub use self::comment_service::CommentService;
pub use self::consistency::{ConsistencyMaintainer, ConsistencyOptions};
pub use self::credentials::{
    CredentialError, LoginCredentials, LoginValidationError, Password, PasswordHash,
};
pub use self::error::{ACCESS_DENIED, Error, ErrorCode};
pub use self::identity::Identity;
pub use self::item::{Item, ItemDraft, ItemId, ItemUpdate, ItemValidationError, Tag};
pub use self::listing_service::ListingService;
pub use self::maintenance_service::MaintenanceService;
pub use self::relationship_service::RelationshipService;
pub use self::slug::{Slug, SlugValidationError};
pub use self::tokens::{SignedToken, TokenClaims, TokenSigner};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, ImageUrl, Role, User, UserId, UserUpdate, UserValidationError, Username,
};
pub use self::views::{AuthView, CommentView, ItemView, ProfileView};
