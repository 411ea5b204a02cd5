//! User accounts, session tokens and role claims.

use chrono::{DateTime, Utc};
use serde::Serialize;

text_enum! {
    /// Role claim attached to every account.
    Role {
        User => "USER",
        Seller => "SELLER",
        Admin => "ADMIN",
    }
}

/// A registered account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
    pub role: Role,
}

/// Session/API token metadata. Only the HMAC of the raw token is stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthToken {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// The authenticated caller, inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether the caller satisfies `required`.
    ///
    /// Admins satisfy every role; sellers also satisfy `USER`.
    pub fn has_role(&self, required: Role) -> bool {
        match (self.role, required) {
            (Role::Admin, _) => true,
            (Role::Seller, Role::Seller | Role::User) => true,
            (Role::User, Role::User) => true,
            _ => false,
        }
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: 1,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(user(Role::Admin).has_role(Role::Seller));
        assert!(user(Role::Admin).has_role(Role::Admin));
        assert!(user(Role::Seller).has_role(Role::User));
        assert!(user(Role::Seller).has_role(Role::Seller));
        assert!(!user(Role::Seller).has_role(Role::Admin));
        assert!(!user(Role::User).has_role(Role::Seller));
    }

    #[test]
    fn test_current_user_from_user() {
        let now = Utc::now();
        let current = CurrentUser::from(User {
            id: 7,
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            picture: None,
            role: Role::Seller,
            created_at: now,
            updated_at: now,
        });

        assert_eq!(current.id, 7);
        assert_eq!(current.role, Role::Seller);
        assert!(!current.is_admin());
    }
}
