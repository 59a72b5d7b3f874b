//! UPT (field clinic) and session models.

use serde::{Deserialize, Serialize};

/// A subordinate field clinic, scoped to a geographic district.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Upt {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub created_at: String,
}

impl Upt {
    pub fn new(name: String, address: String, phone: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            address,
            phone,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Central administrative authority, sees all UPTs
    Dinas,
    /// Field clinic staff, scoped to their own UPT
    Upt,
}

/// The contract exposed by the external auth collaborator.
///
/// Only the fields this core needs for query scoping and event stamping;
/// session lifecycle lives outside the crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
    pub upt_id: Option<String>,
}

impl CurrentUser {
    pub fn dinas(id: String) -> Self {
        Self {
            id,
            role: Role::Dinas,
            upt_id: None,
        }
    }

    pub fn upt(id: String, upt_id: String) -> Self {
        Self {
            id,
            role: Role::Upt,
            upt_id: Some(upt_id),
        }
    }

    /// The UPT this user is restricted to, if any.
    pub fn visible_upt(&self) -> Option<&str> {
        match self.role {
            Role::Dinas => None,
            Role::Upt => self.upt_id.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dinas_sees_everything() {
        let user = CurrentUser::dinas("u1".into());
        assert_eq!(user.visible_upt(), None);
    }

    #[test]
    fn test_upt_user_is_scoped() {
        let user = CurrentUser::upt("u2".into(), "upt-1".into());
        assert_eq!(user.visible_upt(), Some("upt-1"));
    }
}
