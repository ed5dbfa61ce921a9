//! Database schema and shared record models

mod init;
pub mod models;

pub use init::init_database;
