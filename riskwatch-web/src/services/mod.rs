//! External collaborators and the audit pipeline

pub mod audit;
pub mod geoip;
pub mod inference;
