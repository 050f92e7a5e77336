//! Startup wiring for demo data seeding.

mod config;
mod startup;

pub use config::ExampleDataSettings;
pub use startup::{DemoSeedOutcome, DemoSeedingError, seed_demo_data_on_startup};
