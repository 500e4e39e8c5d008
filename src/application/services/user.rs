//! User registry

use std::sync::Arc;

use tracing::info;

use crate::domain::repositories::Change;
use crate::domain::reservation::BookingSummary;
use crate::domain::user::{NewUser, User};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::BookingLocks;

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    locks: Arc<BookingLocks>,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, locks: Arc<BookingLocks>) -> Self {
        Self { repos, locks }
    }

    pub async fn register(&self, mut new: NewUser) -> DomainResult<User> {
        new.email = new.email.trim().to_lowercase();
        if new.name.trim().is_empty() || !new.email.contains('@') {
            return Err(DomainError::Validation("name and a valid email are required".into()));
        }

        let _email_lock = self.locks.user_email(&new.email).await?;
        if self.repos.users().find_by_email(&new.email).await?.is_some() {
            return Err(DomainError::Conflict(format!("user with email {}", new.email)));
        }

        let user = User::new(uuid::Uuid::new_v4().to_string(), new);
        self.repos
            .unit_of_work()
            .commit(vec![Change::InsertUser(user.clone())])
            .await?;
        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    pub async fn get(&self, user_id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))
    }

    /// The user's embedded booking view
    pub async fn bookings(&self, user_id: &str) -> DomainResult<Vec<BookingSummary>> {
        Ok(self.get(user_id).await?.bookings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fixtures::{d, Fixture};
    use crate::domain::UserRole;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Marta".into(),
            email: email.into(),
            role: UserRole::Client,
        }
    }

    #[tokio::test]
    async fn email_is_unique_case_insensitively() {
        let fx = Fixture::new(d(2025, 12, 1)).await;
        let svc = UserService::new(fx.store.clone(), fx.locks.clone());

        let marta = svc.register(new_user("Marta@Example.com")).await.unwrap();
        assert_eq!(marta.email, "marta@example.com");
        assert!(matches!(
            svc.register(new_user("marta@example.com ")).await,
            Err(DomainError::Conflict(_))
        ));
        // seeded by the fixture
        assert!(matches!(
            svc.register(new_user("ana@example.com")).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let fx = Fixture::new(d(2025, 12, 1)).await;
        let svc = UserService::new(fx.store.clone(), fx.locks.clone());
        assert!(matches!(
            svc.register(new_user("not-an-email")).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let fx = Fixture::new(d(2025, 12, 1)).await;
        let svc = UserService::new(fx.store.clone(), fx.locks.clone());
        assert_eq!(
            svc.bookings("nobody").await.unwrap_err(),
            DomainError::UserNotFound("nobody".into())
        );
        assert!(svc.bookings("u1").await.unwrap().is_empty());
    }
}
