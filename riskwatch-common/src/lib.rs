//! # RiskWatch Common Library
//!
//! Shared code for the RiskWatch modules including:
//! - Database schema and record models
//! - Risk classification and confidence formatting
//! - Prediction domain definitions (field descriptors per domain)
//! - Verification token generation
//! - Password hashing primitives
//! - Configuration loading

pub mod auth;
pub mod classify;
pub mod confidence;
pub mod config;
pub mod db;
pub mod domains;
pub mod error;
pub mod token;

pub use classify::{classify, RiskTier};
pub use error::{Error, Result};
