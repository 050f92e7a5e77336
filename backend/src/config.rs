//! Application configuration loaded via OrthoConfig.
//!
//! Every knob can be supplied through `JUMBLE_`-prefixed environment
//! variables, CLI flags, or a config file; absent values fall back to the
//! accessor defaults below. The token secret is the one setting without a
//! production default: release builds refuse to start without it.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::account_service::AccountPolicy;
use crate::domain::authorization::CommentDeletePolicy;
use crate::domain::consistency::ConsistencyOptions;
use crate::domain::tokens::DEFAULT_TOKEN_TTL_DAYS;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Rejections raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The token secret was not valid hex.
    #[error("token secret must be hex-encoded: {0}")]
    MalformedSecret(#[from] hex::FromHexError),
    /// The comment-delete policy named an unknown mode.
    #[error("unknown comment delete policy '{0}', expected 'author-or-seller' or 'any-authenticated'")]
    UnknownCommentPolicy(String),
}

/// Settings controlling the server and the domain policies.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "JUMBLE")]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_address: Option<String>,
    /// Port the HTTP server binds to.
    pub port: Option<u16>,
    /// Hex-encoded HMAC secret for bearer tokens.
    pub token_secret: Option<String>,
    /// Token lifetime in days.
    pub token_ttl_days: Option<i64>,
    /// Login attempts allowed per account per throttle window.
    pub login_attempt_limit: Option<u64>,
    /// Width of the login throttle window in seconds.
    pub login_attempt_window_secs: Option<u64>,
    /// Override for the PBKDF2 round count.
    pub password_rounds: Option<u32>,
    /// Who may delete a comment: `author-or-seller` or `any-authenticated`.
    pub comment_delete_policy: Option<String>,
    /// Serialize favorites recomputation per listing.
    #[ortho_config(default = false)]
    pub serialize_recompute: bool,
}

impl AppConfig {
    /// The socket address pair the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> (String, u16) {
        (
            self.bind_address
                .clone()
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned()),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Decoded token secret bytes, when one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedSecret`] when the value is not hex.
    pub fn token_secret(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        self.token_secret
            .as_deref()
            .map(|raw| hex::decode(raw.trim()).map_err(ConfigError::from))
            .transpose()
    }

    /// Configured token lifetime.
    #[must_use]
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.token_ttl_days.unwrap_or(DEFAULT_TOKEN_TTL_DAYS))
    }

    /// Account policy assembled from the login and hashing knobs.
    #[must_use]
    pub fn account_policy(&self) -> AccountPolicy {
        let defaults = AccountPolicy::default();
        AccountPolicy {
            login_attempt_limit: self
                .login_attempt_limit
                .unwrap_or(defaults.login_attempt_limit),
            login_attempt_window: self
                .login_attempt_window_secs
                .map_or(defaults.login_attempt_window, Duration::from_secs),
            password_rounds: self.password_rounds,
        }
    }

    /// Maintainer options assembled from the consistency knobs.
    #[must_use]
    pub fn consistency_options(&self) -> ConsistencyOptions {
        ConsistencyOptions {
            serialize_recompute: self.serialize_recompute,
            ..ConsistencyOptions::default()
        }
    }

    /// Parsed comment-delete policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCommentPolicy`] for unrecognized
    /// values.
    pub fn comment_policy(&self) -> Result<CommentDeletePolicy, ConfigError> {
        match self.comment_delete_policy.as_deref() {
            None | Some("author-or-seller") => Ok(CommentDeletePolicy::AuthorOrSeller),
            Some("any-authenticated") => Ok(CommentDeletePolicy::AnyAuthenticated),
            Some(other) => Err(ConfigError::UnknownCommentPolicy(other.to_owned())),
        }
    }
}
