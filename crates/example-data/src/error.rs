//! Error types for demo data generation.

/// Errors raised while generating a demo plan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// At least one account is required to build a coherent plan.
    #[error("account count must be at least 1")]
    ZeroAccounts,
    /// The requested account count would overflow the generator's budget.
    #[error("account count must not exceed {max}")]
    TooManyAccounts {
        /// Largest supported account count.
        max: usize,
    },
}
