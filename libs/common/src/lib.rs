//! Shared infrastructure for the banking backend
//!
//! This crate provides the pieces every service-side crate needs:
//! Postgres connection pooling configured from the environment and the
//! database error taxonomy.

pub mod database;
pub mod error;
