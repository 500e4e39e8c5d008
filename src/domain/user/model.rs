use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::reservation::{BookingSummary, UserRef};
use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    Client,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "CLIENT",
            Self::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CLIENT" => Some(Self::Client),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub bookings: Vec<BookingSummary>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: impl Into<String>, new: NewUser) -> Self {
        Self {
            id: id.into(),
            name: new.name,
            email: new.email,
            role: new.role,
            bookings: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn to_ref(&self) -> UserRef {
        UserRef::new(&self.id, &self.name)
    }
}

/// Identity of whoever invokes an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub role: UserRole,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn client(user_id: impl Into<String>) -> Self {
        Self::new(user_id, UserRole::Client)
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::new(user_id, UserRole::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admins act on anyone's records, clients only on their own.
    pub fn may_act_for(&self, owner_id: &str) -> bool {
        self.is_admin() || self.user_id == owner_id
    }

    /// `Forbidden` unless the caller is an administrator.
    pub fn require_admin(&self, action: &str) -> DomainResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "only administrators may {action} (caller {})",
                self.user_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clients_act_only_for_themselves() {
        let caller = Caller::client("u1");
        assert!(caller.may_act_for("u1"));
        assert!(!caller.may_act_for("u2"));
        assert!(Caller::admin("root").may_act_for("u2"));
    }

    #[test]
    fn only_admins_pass_the_admin_gate() {
        assert!(Caller::admin("root").require_admin("deactivate venues").is_ok());
        let err = Caller::client("u1").require_admin("deactivate venues").unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(ref m) if m.contains("deactivate venues")));
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(UserRole::parse("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("CLIENT"), Some(UserRole::Client));
        assert_eq!(UserRole::parse("guest"), None);
    }
}
