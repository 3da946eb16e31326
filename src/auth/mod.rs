pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::{authorize, bearer_token, AuthMiddleware};
pub use password::{BcryptHasher, HashError, PasswordHasher, DEFAULT_COST};
pub use token::{Claims, TokenError, TokenService, TOKEN_LIFETIME_SECS};
