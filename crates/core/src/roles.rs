//! Well-known role names.
//!
//! These must match the rows inserted (and the `ck_roles_name` check) in
//! `db/migrations/20240101000001_create_users_and_roles.sql`.

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MEMBER: &str = "member";
pub const ROLE_SYSTEM_ADMIN: &str = "systemadmin";

/// Fixed set of roles a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
    #[serde(rename = "systemadmin")]
    SystemAdmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Member, Role::SystemAdmin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Member => ROLE_MEMBER,
            Role::SystemAdmin => ROLE_SYSTEM_ADMIN,
        }
    }

    /// Role for a stored name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SystemAdmin)
    }
}

/// Whether a role list grants access to the `/admin/` surface.
///
/// Names that are not one of the fixed roles grant nothing.
pub fn grants_admin<S: AsRef<str>>(roles: &[S]) -> bool {
    roles
        .iter()
        .filter_map(|r| Role::parse(r.as_ref()))
        .any(Role::is_admin)
}
