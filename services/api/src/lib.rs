//! Inkbound API service library
//!
//! Exposes the service modules so integration tests can drive the token
//! lifecycle and repositories directly; the binary entrypoint lives in
//! `main.rs`.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;
