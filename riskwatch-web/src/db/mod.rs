//! Database operations for riskwatch-web

pub mod analytics;
pub mod predictions;
pub mod sessions;
pub mod users;
