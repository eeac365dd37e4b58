//! Sweet Shop Backend Library
//!
//! Exposes the auth, inventory, and server modules for use by the
//! `sweetshop` binary and the integration tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod inventory;
pub mod middleware;
pub mod server;
