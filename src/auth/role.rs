//! Roles and the access control gate

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::auth::AuthError;
use crate::store::User;

/// Permission tier assigned to every account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including account provisioning
    Admin,
    /// Standard access for case management operations
    CaseWorker,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::CaseWorker => write!(f, "case_worker"),
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "case_worker" => Ok(Role::CaseWorker),
            _ => Err(()),
        }
    }
}

/// Require that an authenticated identity holds the given role.
///
/// Pure comparison, no side effects. Runs after session resolution; the
/// composition `resolve` then `require_role` is the gate in front of every
/// protected operation.
pub fn require_role(user: &User, role: Role) -> Result<(), AuthError> {
    if user.role == role {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(role: Role) -> User {
        User {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$irrelevant".into(),
            role,
        }
    }

    #[test]
    fn test_admin_passes_admin_gate() {
        assert!(require_role(&user_with(Role::Admin), Role::Admin).is_ok());
    }

    #[test]
    fn test_case_worker_denied_admin_gate() {
        assert_eq!(
            require_role(&user_with(Role::CaseWorker), Role::Admin),
            Err(AuthError::Forbidden)
        );
    }

    #[test]
    fn test_case_worker_passes_own_gate() {
        assert!(require_role(&user_with(Role::CaseWorker), Role::CaseWorker).is_ok());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse(), Ok(Role::Admin));
        assert_eq!("case_worker".parse(), Ok(Role::CaseWorker));
        assert_eq!("superuser".parse::<Role>(), Err(()));
        assert_eq!("Admin".parse::<Role>(), Err(()));
    }

    #[test]
    fn test_role_display_roundtrip() {
        assert_eq!(Role::Admin.to_string().parse(), Ok(Role::Admin));
        assert_eq!(Role::CaseWorker.to_string().parse(), Ok(Role::CaseWorker));
    }
}
