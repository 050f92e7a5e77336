//! Deterministic demo marketplace data generation.
//!
//! Generates a reproducible plan of accounts, listings, comments, and
//! engagement edges from a numeric seed. The crate is deliberately
//! independent of backend domain types: the backend replays the plan
//! through its own services, so every domain invariant is enforced on the
//! way in.
//!
//! # Example
//!
//! ```
//! use example_data::generate_demo_plan;
//!
//! let plan = generate_demo_plan(42, 4).expect("generation succeeds");
//! assert_eq!(plan.accounts.len(), 4);
//! let replay = generate_demo_plan(42, 4).expect("generation succeeds");
//! assert_eq!(plan, replay);
//! ```

mod error;
mod generator;
mod plan;
mod validation;

pub use error::GenerationError;
pub use generator::{DEFAULT_ACCOUNT_COUNT, generate_demo_plan};
pub use plan::{DemoAccount, DemoComment, DemoFavorite, DemoFollow, DemoListing, DemoPlan};
pub use validation::{USERNAME_MAX, is_valid_username};
