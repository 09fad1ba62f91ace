//! Stored user profiles

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::identity::RequestIdentity;
use crate::domain::zodiac::ZodiacSign;
use crate::domain::DomainError;

/// A stored user profile with their sign computed at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    pub zodiac: ZodiacSign,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The request identity this user resolves to
    pub fn identity(&self) -> RequestIdentity {
        RequestIdentity {
            name: self.name.clone(),
            birth_date: self.birth_date,
            birth_time: self.birth_time.clone(),
            birth_place: self.birth_place.clone(),
        }
    }
}

/// Fields for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub birth_date: NaiveDate,
    pub birth_time: Option<String>,
    pub birth_place: Option<String>,
}

/// Repository for user profiles
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    async fn create(&self, new_user: NewUser) -> Result<User, DomainError>;

    async fn get(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    async fn list(&self) -> Result<Vec<User>, DomainError>;
}

/// In-memory user repository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        let identity = RequestIdentity {
            name: new_user.name.clone(),
            birth_date: new_user.birth_date,
            birth_time: new_user.birth_time.clone(),
            birth_place: new_user.birth_place.clone(),
        };
        identity.validate()?;

        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            birth_date: new_user.birth_date,
            birth_time: new_user.birth_time,
            birth_place: new_user.birth_place,
            zodiac: ZodiacSign::from_birth_date(new_user.birth_date),
            created_at: Utc::now(),
        };

        self.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            name: "Priya".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1995, 8, 20).unwrap(),
            birth_time: Some("06:30".to_string()),
            birth_place: None,
        }
    }

    #[tokio::test]
    async fn test_create_computes_zodiac() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(new_user()).await.unwrap();

        assert_eq!(user.zodiac, ZodiacSign::Leo);
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(new_user()).await.unwrap();

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Priya");

        assert_eq!(repo.list().await.unwrap().len(), 1);
        assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_validates_identity() {
        let repo = InMemoryUserRepository::new();
        let mut bad = new_user();
        bad.name = "".to_string();

        assert!(repo.create(bad).await.is_err());
    }

    #[test]
    fn test_user_identity_projection() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Priya".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1995, 8, 20).unwrap(),
            birth_time: None,
            birth_place: Some("Mumbai".to_string()),
            zodiac: ZodiacSign::Leo,
            created_at: Utc::now(),
        };

        let identity = user.identity();
        assert_eq!(identity.name, "Priya");
        assert_eq!(identity.birth_place.as_deref(), Some("Mumbai"));
    }
}
