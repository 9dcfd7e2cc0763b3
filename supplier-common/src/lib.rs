//! # Supplier Compliance Common Library
//!
//! Shared code for the supplier compliance service:
//! - Domain records (suppliers, compliance records)
//! - Schema provisioning for the relational store
//! - Configuration loading
//! - Calendar date helpers

pub mod config;
pub mod dates;
pub mod db;
pub mod error;

pub use error::{Error, Result};
