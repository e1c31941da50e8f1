use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    /// Argon2id password hash
    pub password_hash: String,

    pub role: Role,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "manager")]
    Manager,
    #[sea_orm(string_value = "user")]
    User,
}

/// Operations gated by the static permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SubmitRequest,
    ListAllRequests,
    ViewDeliveryLogs,
    ManageUsers,
}

impl Role {
    /// Static permission table. Admins can do everything, managers can
    /// submit and see every request, plain users can only submit.
    #[must_use]
    pub const fn permits(self, action: Action) -> bool {
        matches!(
            (self, action),
            (Self::Admin, _)
                | (Self::Manager, Action::SubmitRequest | Action::ListAllRequests)
                | (Self::User, Action::SubmitRequest)
        )
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::User => "user",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_permits_everything() {
        for action in [
            Action::SubmitRequest,
            Action::ListAllRequests,
            Action::ViewDeliveryLogs,
            Action::ManageUsers,
        ] {
            assert!(Role::Admin.permits(action));
        }
    }

    #[test]
    fn test_manager_permissions() {
        assert!(Role::Manager.permits(Action::SubmitRequest));
        assert!(Role::Manager.permits(Action::ListAllRequests));
        assert!(!Role::Manager.permits(Action::ViewDeliveryLogs));
        assert!(!Role::Manager.permits(Action::ManageUsers));
    }

    #[test]
    fn test_user_permissions() {
        assert!(Role::User.permits(Action::SubmitRequest));
        assert!(!Role::User.permits(Action::ListAllRequests));
        assert!(!Role::User.permits(Action::ViewDeliveryLogs));
        assert!(!Role::User.permits(Action::ManageUsers));
    }

    #[test]
    fn test_role_names_round_trip() {
        for role in [Role::Admin, Role::Manager, Role::User] {
            assert_eq!(Role::from_name(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_name("superuser"), None);
    }
}
