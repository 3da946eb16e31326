use std::sync::Arc;

use actix_web::web;
use chrono::Duration;

use crate::auth::{BcryptHasher, PasswordHasher, TokenService};
use crate::config::{Config, MAX_TOKEN_TTL_SECS};
use crate::store::{TaskStore, UserStore};

/// Shared handles to the two stores and the token service.
///
/// The stores are independent; nothing ever locks both.
#[derive(Clone)]
pub struct AppState {
    pub tasks: web::Data<TaskStore>,
    pub users: web::Data<UserStore>,
    pub tokens: web::Data<TokenService>,
}

impl AppState {
    pub fn new(tokens: TokenService, hasher: Arc<dyn PasswordHasher>, bcrypt_cost: u32) -> Self {
        let tokens = Arc::new(tokens);
        let users = UserStore::new(hasher, bcrypt_cost, tokens.clone());

        Self {
            tasks: web::Data::new(TaskStore::new()),
            users: web::Data::new(users),
            tokens: web::Data::from(tokens),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let ttl_secs = config.token_ttl_secs.clamp(1, MAX_TOKEN_TTL_SECS);
        let tokens =
            TokenService::with_lifetime(config.jwt_secret.as_bytes(), Duration::seconds(ttl_secs));
        Self::new(tokens, Arc::new(BcryptHasher), config.bcrypt_cost)
    }

    /// Registers every handle as app data on a service config.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.tasks.clone())
            .app_data(self.users.clone())
            .app_data(self.tokens.clone());
    }
}
