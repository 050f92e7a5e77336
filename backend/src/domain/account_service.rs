//! Account service: registration, login, token resolution, and profile
//! updates.
//!
//! Implements the account-facing driving ports over the user repository.
//! Password plaintext only ever exists inside [`Password`] wrappers; the
//! stored credential is a PHC string derived here. Login failures are
//! throttled per account through the counter-store port, and wrong-email
//! and wrong-password failures are indistinguishable to the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tracing::warn;

use crate::domain::consistency::map_user_error;
use crate::domain::credentials::{LoginCredentials, Password, PasswordHash};
use crate::domain::error::{ACCESS_DENIED, Error};
use crate::domain::identity::Identity;
use crate::domain::ports::{
    AccountsCommand, AccountsQuery, CounterStore, IdentityResolver, LoginService, ProfileUpdate,
    RegisterAccount, UserRepository,
};
use crate::domain::tokens::{SignedToken, TokenSigner};
use crate::domain::user::{User, UserId, UserUpdate};
use crate::domain::views::AuthView;

/// Tuning knobs for account behaviour.
#[derive(Debug, Clone)]
pub struct AccountPolicy {
    /// Failed-or-successful login attempts allowed per account per window.
    pub login_attempt_limit: u64,
    /// Width of the login throttle window.
    pub login_attempt_window: Duration,
    /// Override for the PBKDF2 round count. `None` uses the crate
    /// default; tests and fixture seeding set a low count to stay fast.
    pub password_rounds: Option<u32>,
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            login_attempt_limit: 10,
            login_attempt_window: Duration::from_secs(15 * 60),
            password_rounds: None,
        }
    }
}

/// Account service implementing the account-facing driving ports.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    throttle: Arc<dyn CounterStore>,
    signer: Arc<TokenSigner>,
    clock: Arc<dyn Clock>,
    policy: AccountPolicy,
}

impl AccountService {
    /// Construct the service over its collaborators.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        throttle: Arc<dyn CounterStore>,
        signer: Arc<TokenSigner>,
        clock: Arc<dyn Clock>,
        policy: AccountPolicy,
    ) -> Self {
        Self {
            users,
            throttle,
            signer,
            clock,
            policy,
        }
    }

    fn hash_password(&self, password: &Password) -> Result<PasswordHash, Error> {
        let hashed = match self.policy.password_rounds {
            Some(rounds) => PasswordHash::derive_with_rounds(password, rounds),
            None => PasswordHash::derive(password),
        };
        hashed.map_err(|err| Error::internal(format!("password hashing failed: {err}")))
    }

    fn issue_token(&self, user_id: UserId) -> Result<SignedToken, Error> {
        self.signer
            .issue(user_id, self.clock.utc())
            .map_err(|err| Error::internal(format!("token issuance failed: {err}")))
    }

    async fn load_account(&self, identity: Identity) -> Result<User, Error> {
        self.users
            .find_by_id(&identity.user_id())
            .await
            .map_err(map_user_error)?
            // The token verified but the account is gone; treat the caller
            // as unauthenticated rather than leaking lifecycle detail.
            .ok_or_else(|| Error::unauthorized(ACCESS_DENIED))
    }

    fn auth_view(&self, user: &User) -> Result<AuthView, Error> {
        let token = self.issue_token(user.id())?;
        Ok(AuthView::of(user, &token))
    }

    /// Count a login attempt, refusing once the window's budget is spent.
    ///
    /// A broken throttle store fails open: login availability wins over
    /// throttling precision.
    async fn check_throttle(&self, email: &str) -> Result<(), Error> {
        let key = format!("login:{email}");
        match self
            .throttle
            .increment(&key, self.policy.login_attempt_window)
            .await
        {
            Ok(tally) if tally > self.policy.login_attempt_limit => Err(Error::service_unavailable(
                "too many login attempts, try again later",
            )),
            Ok(_) => Ok(()),
            Err(err) => {
                warn!(%err, "login throttle unavailable, allowing attempt");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl LoginService for AccountService {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthView, Error> {
        self.check_throttle(credentials.email()).await?;
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?;
        // Verify even the miss path stays on the same error to avoid
        // confirming which emails have accounts.
        let Some(user) = user else {
            return Err(Error::unauthorized(ACCESS_DENIED));
        };
        if !user.password_hash().verify(credentials.password()) {
            return Err(Error::unauthorized(ACCESS_DENIED));
        }
        self.auth_view(&user)
    }
}

#[async_trait]
impl AccountsCommand for AccountService {
    async fn register(&self, request: RegisterAccount) -> Result<AuthView, Error> {
        let RegisterAccount {
            username,
            email,
            password,
        } = request;
        let hash = self.hash_password(&password)?;
        let user = User::new(UserId::random(), username, email, hash, self.clock.utc());
        self.users.insert(&user).await.map_err(map_user_error)?;
        self.auth_view(&user)
    }

    async fn update_profile(
        &self,
        identity: Identity,
        update: ProfileUpdate,
    ) -> Result<AuthView, Error> {
        let mut user = self.load_account(identity).await?;
        if update.is_empty() {
            return self.auth_view(&user);
        }
        let ProfileUpdate {
            username,
            email,
            password,
            bio,
            image,
        } = update;
        let password_hash = password
            .map(|password| self.hash_password(&password))
            .transpose()?;
        user.apply(UserUpdate {
            username,
            email,
            password_hash,
            bio,
            image,
        });
        self.users.update(&user).await.map_err(map_user_error)?;
        self.auth_view(&user)
    }
}

#[async_trait]
impl AccountsQuery for AccountService {
    async fn current_user(&self, identity: Identity) -> Result<AuthView, Error> {
        let user = self.load_account(identity).await?;
        self.auth_view(&user)
    }
}

#[async_trait]
impl IdentityResolver for AccountService {
    async fn resolve_token(&self, raw: &str) -> Option<Identity> {
        let claims = self.signer.verify(raw, self.clock.utc())?;
        let user = self.users.find_by_id(&claims.user_id()).await.ok()??;
        Some(Identity::new(user.id(), user.role()))
    }
}

#[cfg(test)]
mod tests;
