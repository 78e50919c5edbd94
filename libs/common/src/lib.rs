//! Common library for the Inkbound backend
//!
//! This crate provides the infrastructure shared by the Inkbound services:
//! PostgreSQL connection pooling and the database error taxonomy.

pub mod database;
pub mod error;
