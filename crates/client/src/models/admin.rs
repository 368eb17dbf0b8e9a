//! Admin profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oakline_core::{AdminId, Email, Role};

/// An admin profile as returned by the admin login endpoint.
///
/// Unlike [`super::UserProfile`], the presence of an admin credential is
/// itself the privilege: the role field is informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    /// Backend document id.
    #[serde(rename = "_id")]
    pub id: AdminId,
    /// Display name.
    pub admin_name: String,
    /// Account email.
    pub email: Email,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
