//! # CDG Common Library
//!
//! Shared code for the Compliance Demo Generator seeders including:
//! - Deterministic seeded random provider
//! - Weighted template selection and placeholder substitution
//! - Pool/quota assignment and follow-up chain tracking
//! - Database schema, models, and chunked upsert writer
//! - Configuration loading

pub mod chain;
pub mod config;
pub mod db;
pub mod error;
pub mod placeholder;
pub mod pool;
pub mod rng;
pub mod template;

pub use error::{Error, Result};
pub use rng::SeedRng;
