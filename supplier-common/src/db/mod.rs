//! Database models and schema provisioning

pub mod init;
pub mod models;

pub use init::*;
pub use models::*;
