//! End-user profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oakline_core::{AddressId, Email, Role, UserId};

/// A user profile as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Backend document id.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: Email,
    /// Account role; drives admin-console access for user sessions.
    #[serde(default)]
    pub role: Role,
    /// Saved shipping addresses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_profile() {
        let json = r#"{
            "_id": "u-1",
            "name": "Asha",
            "email": "asha@example.com",
            "role": "admin",
            "createdAt": "2026-01-10T08:30:00Z",
            "updatedAt": "2026-01-11T09:00:00Z"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, UserId::new("u-1"));
        assert!(profile.role.is_admin());
        assert!(profile.addresses.is_empty());
    }

    #[test]
    fn test_missing_role_defaults_to_customer() {
        let json = r#"{
            "_id": "u-2",
            "name": "Ben",
            "email": "ben@example.com",
            "createdAt": "2026-01-10T08:30:00Z",
            "updatedAt": "2026-01-10T08:30:00Z"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.role, Role::Customer);
    }
}
