//! Ownership-based authorization checks.
//!
//! All checks fail with [`ErrorCode::Forbidden`](crate::domain::ErrorCode)
//! and the shared access-denied message, so callers cannot probe which rule
//! rejected them.

use serde::{Deserialize, Serialize};

use crate::domain::error::{ACCESS_DENIED, Error};
use crate::domain::identity::Identity;
use crate::domain::user::UserId;

/// Who may delete a comment, beyond operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentDeletePolicy {
    /// The comment author or the seller of the commented listing.
    #[default]
    AuthorOrSeller,
    /// Any signed-in user.
    AnyAuthenticated,
}

/// Require that the caller is the seller of a listing.
pub fn require_seller(identity: Identity, seller_id: UserId) -> Result<(), Error> {
    if identity.user_id() == seller_id {
        Ok(())
    } else {
        Err(Error::forbidden(ACCESS_DENIED))
    }
}

/// Require that the caller may delete a comment under the active policy.
///
/// Admins may always delete; otherwise the policy decides between the
/// comment author and the listing seller.
pub fn require_comment_delete(
    policy: CommentDeletePolicy,
    identity: Identity,
    author_id: UserId,
    seller_id: UserId,
) -> Result<(), Error> {
    if identity.is_admin() {
        return Ok(());
    }
    let permitted = match policy {
        CommentDeletePolicy::AnyAuthenticated => true,
        CommentDeletePolicy::AuthorOrSeller => {
            identity.user_id() == author_id || identity.user_id() == seller_id
        }
    };
    if permitted {
        Ok(())
    } else {
        Err(Error::forbidden(ACCESS_DENIED))
    }
}

/// Require operator capabilities.
pub fn require_admin(identity: Identity) -> Result<(), Error> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden(ACCESS_DENIED))
    }
}

#[cfg(test)]
mod tests {
    //! Policy matrix coverage.
    use rstest::rstest;

    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::user::Role;

    fn identity(id: UserId, role: Role) -> Identity {
        Identity::new(id, role)
    }

    #[test]
    fn seller_check_accepts_owner_and_rejects_others() {
        let seller = UserId::random();
        let outsider = UserId::random();

        assert!(require_seller(identity(seller, Role::User), seller).is_ok());
        let err = require_seller(identity(outsider, Role::User), seller)
            .expect_err("outsider must be rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), ACCESS_DENIED);
    }

    #[rstest]
    #[case(CommentDeletePolicy::AuthorOrSeller, true, false, false, true)]
    #[case(CommentDeletePolicy::AuthorOrSeller, false, true, false, true)]
    #[case(CommentDeletePolicy::AuthorOrSeller, false, false, false, false)]
    #[case(CommentDeletePolicy::AuthorOrSeller, false, false, true, true)]
    #[case(CommentDeletePolicy::AnyAuthenticated, false, false, false, true)]
    fn comment_delete_policy_matrix(
        #[case] policy: CommentDeletePolicy,
        #[case] as_author: bool,
        #[case] as_seller: bool,
        #[case] as_admin: bool,
        #[case] allowed: bool,
    ) {
        let author = UserId::random();
        let seller = UserId::random();
        let caller = if as_author {
            author
        } else if as_seller {
            seller
        } else {
            UserId::random()
        };
        let role = if as_admin { Role::Admin } else { Role::User };

        let result = require_comment_delete(policy, identity(caller, role), author, seller);
        assert_eq!(result.is_ok(), allowed);
    }

    #[test]
    fn admin_check_requires_operator_role() {
        assert!(require_admin(identity(UserId::random(), Role::Admin)).is_ok());
        let err = require_admin(identity(UserId::random(), Role::User))
            .expect_err("plain users must be rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[test]
    fn policy_deserializes_from_snake_case() {
        let policy: CommentDeletePolicy =
            serde_json::from_str("\"any_authenticated\"").expect("parse policy");
        assert_eq!(policy, CommentDeletePolicy::AnyAuthenticated);
        assert_eq!(CommentDeletePolicy::default(), CommentDeletePolicy::AuthorOrSeller);
    }
}
