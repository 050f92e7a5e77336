//! Startup seeding orchestration.
//!
//! The generated plan is replayed through the driving ports rather than
//! written to storage directly, so seeded data passes the same validation
//! and consistency paths as real traffic.

use example_data::{DemoPlan, GenerationError, generate_demo_plan};
use thiserror::Error;
use tracing::info;

use crate::domain::item::ItemDraft;
use crate::domain::ports::RegisterAccount;
use crate::domain::user::{Email, Username};
use crate::domain::{Error, Identity, Password};
use crate::example_data::config::ExampleDataSettings;
use crate::inbound::http::state::HttpState;

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum DemoSeedingError {
    /// Plan generation failed.
    #[error("demo plan generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// A generated record did not satisfy domain validation.
    #[error("demo record failed validation: {0}")]
    Validation(String),
    /// A domain operation rejected the replay.
    #[error(transparent)]
    Domain(#[from] Error),
}

/// What a completed seeding run created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSeedOutcome {
    pub accounts: usize,
    pub listings: usize,
    pub comments: usize,
    pub follows: usize,
    pub favorites: usize,
}

/// Apply demo data on startup when enabled.
///
/// # Errors
///
/// Returns [`DemoSeedingError`] when generation or any replayed operation
/// fails. Seeding is not idempotent across restarts with persistent
/// storage, but the in-memory store starts empty on every boot.
pub async fn seed_demo_data_on_startup(
    settings: &ExampleDataSettings,
    state: &HttpState,
) -> Result<Option<DemoSeedOutcome>, DemoSeedingError> {
    if !settings.enabled {
        info!(reason = "disabled", "demo data seeding skipped");
        return Ok(None);
    }

    let plan = generate_demo_plan(settings.seed(), settings.count())?;
    let outcome = replay_plan(state, &plan).await?;
    info!(
        accounts = outcome.accounts,
        listings = outcome.listings,
        comments = outcome.comments,
        follows = outcome.follows,
        favorites = outcome.favorites,
        seed = settings.seed(),
        "demo data seeding applied"
    );
    Ok(Some(outcome))
}

fn reject(message: impl Into<String>) -> DemoSeedingError {
    DemoSeedingError::Validation(message.into())
}

async fn replay_plan(
    state: &HttpState,
    plan: &DemoPlan,
) -> Result<DemoSeedOutcome, DemoSeedingError> {
    let mut identities = Vec::with_capacity(plan.accounts.len());
    for account in &plan.accounts {
        let request = RegisterAccount {
            username: Username::new(account.username.clone())
                .map_err(|e| reject(e.to_string()))?,
            email: Email::new(account.email.clone()).map_err(|e| reject(e.to_string()))?,
            password: Password::new(&account.password).map_err(|e| reject(e.to_string()))?,
        };
        let view = state.accounts.register(request).await?;
        let identity = state
            .identity
            .resolve_token(&view.token)
            .await
            .ok_or_else(|| reject("freshly issued token did not resolve"))?;
        identities.push(identity);
    }

    let seller_of = |index: usize| -> Result<Identity, DemoSeedingError> {
        identities
            .get(index)
            .copied()
            .ok_or_else(|| reject(format!("plan references missing account {index}")))
    };

    let mut slugs = Vec::with_capacity(plan.listings.len());
    for listing in &plan.listings {
        let draft = ItemDraft::try_new(
            listing.title.clone(),
            listing.description.clone(),
            listing.body.clone(),
            listing.tags.clone(),
        )
        .map_err(|e| reject(e.to_string()))?;
        let view = state
            .listings
            .create_item(seller_of(listing.seller)?, draft)
            .await?;
        slugs.push(view.slug);
    }

    let slug_of = |index: usize| -> Result<&str, DemoSeedingError> {
        slugs
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| reject(format!("plan references missing listing {index}")))
    };

    for comment in &plan.comments {
        state
            .comments
            .add_comment(seller_of(comment.author)?, slug_of(comment.listing)?, &comment.body)
            .await?;
    }

    for follow in &plan.follows {
        let followed = plan
            .accounts
            .get(follow.followed)
            .ok_or_else(|| reject(format!("plan references missing account {}", follow.followed)))?;
        state
            .engagement
            .follow(seller_of(follow.follower)?, &followed.username)
            .await?;
    }

    for favorite in &plan.favorites {
        state
            .engagement
            .favorite(seller_of(favorite.account)?, slug_of(favorite.listing)?)
            .await?;
    }

    Ok(DemoSeedOutcome {
        accounts: plan.accounts.len(),
        listings: slugs.len(),
        comments: plan.comments.len(),
        follows: plan.follows.len(),
        favorites: plan.favorites.len(),
    })
}
