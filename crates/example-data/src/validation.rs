//! Username validation mirroring the backend's account constraints.

/// Maximum username length accepted by the backend.
pub const USERNAME_MAX: usize = 40;

/// Whether a username would pass the backend's account validation:
/// non-empty, at most [`USERNAME_MAX`] characters, ASCII alphanumeric.
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= USERNAME_MAX
        && username.chars().all(|c| c.is_ascii_alphanumeric())
}
