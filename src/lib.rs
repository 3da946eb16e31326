#![doc = "The `tasktrack` library crate."]
#![doc = ""]
#![doc = "In-memory task tracking behind bearer-token auth: the concurrent task and user"]
#![doc = "stores, password hashing, token issuance/validation, the request gate, and the"]
#![doc = "actix-web routes and error mapping that expose them. The binary (`main.rs`)"]
#![doc = "only reads configuration and runs the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use error::AppError;
pub use state::AppState;
