//! Demo data configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_SEED: u64 = 42;

/// Configuration values controlling demo data seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EXAMPLE_DATA")]
pub struct ExampleDataSettings {
    /// Enable demo data seeding on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Deterministic generation seed.
    pub seed: Option<u64>,
    /// Optional override for the number of accounts generated.
    pub count: Option<usize>,
}

impl ExampleDataSettings {
    /// The configured seed, falling back to the default.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// The configured account count, falling back to the generator default.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.unwrap_or(example_data::DEFAULT_ACCOUNT_COUNT)
    }
}
