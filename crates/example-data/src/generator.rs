//! Deterministic plan generation.
//!
//! All randomness flows through one ChaCha stream seeded by the caller,
//! so a given `(seed, account_count)` pair always yields the same plan.

use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::faker::name::en::FirstName;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GenerationError;
use crate::plan::{DemoAccount, DemoComment, DemoFavorite, DemoFollow, DemoListing, DemoPlan};
use crate::validation::is_valid_username;

/// Account count used when the caller does not override it.
pub const DEFAULT_ACCOUNT_COUNT: usize = 8;

/// Upper bound keeping generated datasets demo-sized.
const MAX_ACCOUNT_COUNT: usize = 1000;

const TAG_POOL: [&str; 8] = [
    "vintage",
    "handmade",
    "electronics",
    "books",
    "furniture",
    "outdoors",
    "games",
    "art",
];

/// Generate a replayable demo plan from a numeric seed.
///
/// Every account publishes between one and three listings, follows one
/// other account, and favorites up to two listings. Usernames satisfy the
/// backend's validation rules and are unique within the plan.
///
/// # Errors
///
/// Returns [`GenerationError`] when `account_count` is zero or exceeds the
/// generator's budget.
pub fn generate_demo_plan(seed: u64, account_count: usize) -> Result<DemoPlan, GenerationError> {
    if account_count == 0 {
        return Err(GenerationError::ZeroAccounts);
    }
    if account_count > MAX_ACCOUNT_COUNT {
        return Err(GenerationError::TooManyAccounts {
            max: MAX_ACCOUNT_COUNT,
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let accounts = generate_accounts(&mut rng, seed, account_count);
    let listings = generate_listings(&mut rng, account_count);
    let comments = generate_comments(&mut rng, account_count, listings.len());
    let follows = generate_follows(&mut rng, account_count);
    let favorites = generate_favorites(&mut rng, account_count, listings.len());

    Ok(DemoPlan {
        accounts,
        listings,
        comments,
        follows,
        favorites,
    })
}

fn generate_accounts(rng: &mut ChaCha8Rng, seed: u64, count: usize) -> Vec<DemoAccount> {
    (0..count)
        .map(|index| {
            let name: String = FirstName().fake_with_rng(rng);
            let stem: String = name
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase();
            let stem = if stem.is_empty() {
                "trader".to_owned()
            } else {
                stem
            };
            // The index suffix keeps usernames unique across the plan.
            let username = format!("{stem}{index}");
            debug_assert!(is_valid_username(&username));
            DemoAccount {
                email: format!("{username}@example.com"),
                password: format!("demo-pass-{seed}-{index}"),
                bio: Sentence(3..8).fake_with_rng(rng),
                username,
            }
        })
        .collect()
}

fn generate_listings(rng: &mut ChaCha8Rng, account_count: usize) -> Vec<DemoListing> {
    let mut listings = Vec::new();
    for seller in 0..account_count {
        let listing_count = rng.random_range(1..=3);
        for _ in 0..listing_count {
            let tag_count = rng.random_range(1..=2);
            let tags = (0..tag_count)
                .filter_map(|_| {
                    TAG_POOL
                        .get(rng.random_range(0..TAG_POOL.len()))
                        .map(|tag| (*tag).to_owned())
                })
                .collect();
            listings.push(DemoListing {
                seller,
                title: Sentence(2..5).fake_with_rng(rng),
                description: Sentence(4..10).fake_with_rng(rng),
                body: Paragraph(1..3).fake_with_rng(rng),
                tags,
            });
        }
    }
    listings
}

fn generate_comments(
    rng: &mut ChaCha8Rng,
    account_count: usize,
    listing_count: usize,
) -> Vec<DemoComment> {
    (0..listing_count)
        .filter_map(|listing| {
            rng.random_bool(0.6).then(|| DemoComment {
                author: rng.random_range(0..account_count),
                listing,
                body: Sentence(3..12).fake_with_rng(rng),
            })
        })
        .collect()
}

fn generate_follows(rng: &mut ChaCha8Rng, account_count: usize) -> Vec<DemoFollow> {
    if account_count < 2 {
        return Vec::new();
    }
    (0..account_count)
        .map(|follower| {
            let offset = rng.random_range(1..account_count);
            let mut followed = follower + offset;
            if followed >= account_count {
                followed -= account_count;
            }
            DemoFollow { follower, followed }
        })
        .collect()
}

fn generate_favorites(
    rng: &mut ChaCha8Rng,
    account_count: usize,
    listing_count: usize,
) -> Vec<DemoFavorite> {
    let mut favorites = Vec::new();
    for account in 0..account_count {
        let mut picks: Vec<usize> = (0..rng.random_range(0..=2))
            .map(|_| rng.random_range(0..listing_count))
            .collect();
        picks.sort_unstable();
        picks.dedup();
        favorites.extend(
            picks
                .into_iter()
                .map(|listing| DemoFavorite { account, listing }),
        );
    }
    favorites
}
