//! Password material: login payload validation, PBKDF2 hashing, and
//! verification.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Hashes travel as PHC strings so the work factor is embedded alongside
//! the salt and digest.

use std::fmt;

use password_hash::{PasswordHash as ParsedHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{Params, Pbkdf2};
use zeroize::Zeroizing;

/// Length in bytes of freshly generated salts.
const SALT_LEN: usize = 16;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Errors produced while deriving or parsing password hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Password was blank.
    EmptyPassword,
    /// Stored hash string is not a parseable PHC string.
    InvalidHash,
    /// Salt generation or digest computation failed.
    Hashing { message: String },
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::InvalidHash => write!(f, "stored password hash is not a valid PHC string"),
            Self::Hashing { message } => write!(f, "password hashing failed: {message}"),
        }
    }
}

impl std::error::Error for CredentialError {}

/// Validated login credentials used by the authentication service.
///
/// ## Invariants
/// - `email` is trimmed, lowercased, and non-empty. It is deliberately not
///   validated for shape: a malformed email simply matches no account.
/// - `password` is non-empty but retains caller-provided whitespace to
///   avoid surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_ascii_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Lowercased email string suitable for account lookups.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Plaintext password accepted at registration or profile update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and construct a [`Password`] from raw input.
    pub fn new(raw: &str) -> Result<Self, CredentialError> {
        if raw.is_empty() {
            return Err(CredentialError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the plaintext for hashing and verification.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Derived password hash in PHC string format.
///
/// The PHC string embeds the algorithm, work factor, and salt, so
/// verification works regardless of the parameters in force when the hash
/// was derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Derive a hash with the crate-default PBKDF2 work factor.
    pub fn derive(password: &Password) -> Result<Self, CredentialError> {
        let salt = generate_salt()?;
        let phc = Pbkdf2
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|err| CredentialError::Hashing {
                message: err.to_string(),
            })?;
        Ok(Self(phc.to_string()))
    }

    /// Derive a hash with an explicit round count.
    ///
    /// Production uses the default work factor; lower counts keep fixture
    /// seeding and test suites fast.
    pub fn derive_with_rounds(password: &Password, rounds: u32) -> Result<Self, CredentialError> {
        let salt = generate_salt()?;
        let params = Params {
            rounds,
            ..Params::default()
        };
        let phc = Pbkdf2
            .hash_password_customized(
                password.as_str().as_bytes(),
                None,
                None,
                params,
                salt.as_salt(),
            )
            .map_err(|err| CredentialError::Hashing {
                message: err.to_string(),
            })?;
        Ok(Self(phc.to_string()))
    }

    /// Check a candidate password against this hash.
    ///
    /// Any parse or verification failure reads as a mismatch; callers never
    /// learn why a credential was rejected.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        ParsedHash::new(&self.0)
            .map(|parsed| {
                Pbkdf2
                    .verify_password(candidate.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// The PHC string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn generate_salt() -> Result<SaltString, CredentialError> {
    let mut bytes = [0u8; SALT_LEN];
    getrandom::getrandom(&mut bytes).map_err(|err| CredentialError::Hashing {
        message: err.to_string(),
    })?;
    SaltString::encode_b64(&bytes).map_err(|err| CredentialError::Hashing {
        message: err.to_string(),
    })
}

impl From<PasswordHash> for String {
    fn from(value: PasswordHash) -> Self {
        value.0
    }
}

impl TryFrom<String> for PasswordHash {
    type Error = CredentialError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ParsedHash::new(&value).map_err(|_| CredentialError::InvalidHash)?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    const TEST_ROUNDS: u32 = 1_000;

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("valid password")
    }

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("buyer@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_login_payloads(
        #[case] email: &str,
        #[case] pw: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err =
            LoginCredentials::try_from_parts(email, pw).expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn login_credentials_trim_and_lowercase_email() {
        let creds = LoginCredentials::try_from_parts("  Buyer@Example.COM  ", "  secret  ")
            .expect("valid inputs should succeed");
        assert_eq!(creds.email(), "buyer@example.com");
        assert_eq!(creds.password(), "  secret  ");
    }

    #[test]
    fn empty_password_is_rejected() {
        assert_eq!(Password::new(""), Err(CredentialError::EmptyPassword));
    }

    #[test]
    fn derived_hash_verifies_original_and_rejects_others() {
        let hash = PasswordHash::derive_with_rounds(&password("correct horse"), TEST_ROUNDS)
            .expect("hashing should succeed");
        assert!(hash.verify("correct horse"));
        assert!(!hash.verify("battery staple"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn derived_hashes_use_unique_salts() {
        let first = PasswordHash::derive_with_rounds(&password("secret"), TEST_ROUNDS)
            .expect("hashing should succeed");
        let second = PasswordHash::derive_with_rounds(&password("secret"), TEST_ROUNDS)
            .expect("hashing should succeed");
        assert_ne!(first.as_str(), second.as_str());
        assert!(first.verify("secret"));
        assert!(second.verify("secret"));
    }

    #[test]
    fn phc_round_trips_through_try_from() {
        let hash = PasswordHash::derive_with_rounds(&password("secret"), TEST_ROUNDS)
            .expect("hashing should succeed");
        let restored =
            PasswordHash::try_from(hash.as_str().to_owned()).expect("stored PHC should parse");
        assert!(restored.verify("secret"));
    }

    #[test]
    fn garbage_hash_strings_are_rejected() {
        assert_eq!(
            PasswordHash::try_from("not-a-phc-string".to_owned()),
            Err(CredentialError::InvalidHash)
        );
    }
}
