/*
 * Responsibility
 * - In-memory user collection shared by every request
 * - Names are unique (case-insensitive)
 * - Every read-modify-write sequence runs under one write guard
 */
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub age: i32,
}

impl User {
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }

    fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[derive(Clone, Debug, Default)]
pub struct UserRepo {
    users: Arc<RwLock<Vec<User>>>,
}

impl UserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(vec![User::new("Alice", 25), User::new("Bob", 30)])
    }

    pub async fn list(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    pub async fn get(&self, name: &str) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.is_named(name))
            .cloned()
    }

    pub async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.is_named(&user.name)) {
            return Err(RepoError::Conflict(user.name));
        }

        users.push(user.clone());
        Ok(user)
    }

    /// Replace the user stored under `name`.
    ///
    /// `new_name` of `None` keeps the stored name. Renaming onto another
    /// existing user's name is a conflict.
    pub async fn update(
        &self,
        name: &str,
        new_name: Option<String>,
        age: i32,
    ) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        let index = users
            .iter()
            .position(|u| u.is_named(name))
            .ok_or_else(|| RepoError::NotFound(name.to_string()))?;

        let new_name = new_name.unwrap_or_else(|| users[index].name.clone());
        if users
            .iter()
            .enumerate()
            .any(|(i, u)| i != index && u.is_named(&new_name))
        {
            return Err(RepoError::Conflict(new_name));
        }

        let user = User::new(new_name, age);
        users[index] = user.clone();
        Ok(user)
    }

    pub async fn delete(&self, name: &str) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        let index = users
            .iter()
            .position(|u| u.is_named(name))
            .ok_or_else(|| RepoError::NotFound(name.to_string()))?;

        Ok(users.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookups_ignore_case() {
        let repo = UserRepo::seeded();
        assert_eq!(repo.get("alice").await, Some(User::new("Alice", 25)));
        assert_eq!(repo.get("BOB").await, Some(User::new("Bob", 30)));
        assert_eq!(repo.get("carol").await, None);
    }

    #[tokio::test]
    async fn duplicate_names_conflict() {
        let repo = UserRepo::seeded();
        let err = repo.create(User::new("ALICE", 40)).await.unwrap_err();
        assert_eq!(err, RepoError::Conflict("ALICE".to_string()));
        assert_eq!(repo.list().await.len(), 2);
    }

    #[tokio::test]
    async fn update_replaces_and_rejects_renames_onto_others() {
        let repo = UserRepo::seeded();

        let updated = repo.update("alice", None, 26).await.unwrap();
        assert_eq!(updated, User::new("Alice", 26));
        assert_eq!(repo.get("Alice").await.unwrap().age, 26);

        let renamed = repo.update("alice", Some("Alicia".to_string()), 27).await.unwrap();
        assert_eq!(renamed, User::new("Alicia", 27));
        assert_eq!(repo.get("alice").await, None);

        let err = repo
            .update("alicia", Some("bob".to_string()), 26)
            .await
            .unwrap_err();
        assert_eq!(err, RepoError::Conflict("bob".to_string()));

        let err = repo.update("carol", None, 20).await.unwrap_err();
        assert_eq!(err, RepoError::NotFound("carol".to_string()));
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let repo = UserRepo::seeded();
        assert_eq!(repo.delete("bob").await.unwrap().name, "Bob");
        assert_eq!(
            repo.delete("bob").await.unwrap_err(),
            RepoError::NotFound("bob".to_string())
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_of_one_name_admit_exactly_one() {
        let repo = UserRepo::new(Vec::new());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(User::new("Carol", 20 + (i % 50))).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repo.list().await.len(), 1);
    }
}
