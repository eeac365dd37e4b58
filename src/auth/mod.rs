//! Authentication Module
//!
//! Credential store, token service, and the request auth gate.

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod user_store;

pub use jwt::JwtHandler;
pub use middleware::{auth_middleware, AdminIdentity};
pub use models::{Claims, Identity, User};
pub use user_store::{UserStore, UserStoreError};
