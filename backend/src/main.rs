//! Backend entry-point: wires the REST endpoints and OpenAPI docs.

mod server;

use std::env;

use actix_web::web;
use ortho_config::OrthoConfig;
use rand::RngCore;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::config::AppConfig;
use backend::inbound::http::health::HealthState;

use server::{ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::load().map_err(std::io::Error::other)?;
    let token_secret = match config.token_secret().map_err(std::io::Error::other)? {
        Some(secret) => secret,
        None => ephemeral_secret()?,
    };
    let comment_policy = config.comment_policy().map_err(std::io::Error::other)?;

    let server_config = ServerConfig {
        bind_addr: config.bind_addr(),
        token_secret,
        token_ttl: config.token_ttl(),
        account_policy: config.account_policy(),
        consistency: config.consistency_options(),
        comment_policy,
    };

    let bind_addr = server_config.bind_addr.clone();
    let http_state = build_http_state(&server_config);

    #[cfg(feature = "example-data")]
    {
        use backend::example_data::{ExampleDataSettings, seed_demo_data_on_startup};

        let settings = ExampleDataSettings::load().map_err(std::io::Error::other)?;
        seed_demo_data_on_startup(&settings, &http_state)
            .await
            .map_err(std::io::Error::other)?;
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, http_state, bind_addr)?.await
}

/// Generate a process-lifetime token secret when none is configured.
///
/// Allowed in debug builds and when explicitly opted into; release builds
/// refuse to start so tokens never silently invalidate across restarts.
fn ephemeral_secret() -> std::io::Result<Vec<u8>> {
    let allow_dev = env::var("JUMBLE_ALLOW_EPHEMERAL_SECRET").ok().as_deref() == Some("1");
    if cfg!(debug_assertions) || allow_dev {
        warn!("using ephemeral token secret (dev only); tokens expire on restart");
        let mut secret = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Ok(secret)
    } else {
        Err(std::io::Error::other(
            "JUMBLE_TOKEN_SECRET must be set in release builds",
        ))
    }
}
