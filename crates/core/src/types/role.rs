//! Account roles.

use serde::{Deserialize, Serialize};

/// Role attached to a user or admin profile by the backend.
///
/// Unknown role strings deserialize to [`Role::Unknown`] rather than failing,
/// since the backend may grow roles the client has not heard of. Unknown
/// roles never grant admin access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
    Superadmin,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Whether this role grants access to the admin console.
    ///
    /// This is the single place the role-set membership rule lives; callers
    /// must derive admin status from the profile role through here, never
    /// store it separately.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::Superadmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
            Self::Superadmin => write!(f, "superadmin"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_roles() {
        assert!(Role::Admin.is_admin());
        assert!(Role::Superadmin.is_admin());
        assert!(!Role::Customer.is_admin());
        assert!(!Role::Unknown.is_admin());
    }

    #[test]
    fn test_deserialize_known() {
        let role: Role = serde_json::from_str("\"superadmin\"").unwrap();
        assert_eq!(role, Role::Superadmin);
    }

    #[test]
    fn test_deserialize_unknown_is_not_admin() {
        let role: Role = serde_json::from_str("\"auditor\"").unwrap();
        assert_eq!(role, Role::Unknown);
        assert!(!role.is_admin());
    }
}
