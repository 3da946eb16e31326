use std::sync::Arc;

use uuid::Uuid;

use crate::auth::{PasswordHasher, TokenService};
use crate::models::User;
use crate::store::{Keyed, StoreError};

/// Concurrent in-memory collection of users.
///
/// Registration and login both run entirely under the exclusive lock,
/// including the password hashing/verification and token issuance they
/// trigger. Login is logically read-only but is serialized all the same.
pub struct UserStore {
    users: Keyed<User>,
    hasher: Arc<dyn PasswordHasher>,
    cost: u32,
    tokens: Arc<TokenService>,
}

impl UserStore {
    pub fn new(hasher: Arc<dyn PasswordHasher>, cost: u32, tokens: Arc<TokenService>) -> Self {
        Self {
            users: Keyed::new(),
            hasher,
            cost,
            tokens,
        }
    }

    /// Registers `username` and returns a freshly issued token.
    ///
    /// Usernames are not required to be unique. If hashing or token issuance
    /// fails nothing is stored.
    pub fn create(&self, username: &str, password: &str) -> Result<String, StoreError> {
        self.users.write(|users| -> Result<String, StoreError> {
            let password_hash = self.hasher.hash(password, self.cost)?;
            let token = self.tokens.generate_token()?;

            let id = Uuid::new_v4().to_string();
            users.insert(
                id.clone(),
                User {
                    id: id.clone(),
                    username: username.to_string(),
                    password_hash,
                },
            );

            log::info!("Registered user {} ({})", username, id);
            Ok(token)
        })
    }

    /// Scans every user for one named `username` whose hash verifies against
    /// `password`, and issues a new token for the first match.
    pub fn login(&self, username: &str, password: &str) -> Result<String, StoreError> {
        self.users.write(|users| -> Result<String, StoreError> {
            let matched = users
                .values()
                .any(|u| u.username == username && self.hasher.verify(&u.password_hash, password));

            if !matched {
                log::warn!("Failed login attempt for username {}", username);
                return Err(StoreError::InvalidCredentials);
            }

            Ok(self.tokens.generate_token()?)
        })
    }

    pub fn len(&self) -> usize {
        self.users.read(|users| users.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn find_by_username(&self, username: &str) -> Vec<User> {
        self.users.read(|users| {
            users
                .values()
                .filter(|u| u.username == username)
                .cloned()
                .collect()
        })
    }
}
