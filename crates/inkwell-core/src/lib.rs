//! # Inkwell Core
//!
//! The domain layer of Inkwell: reactions, popularity counters and post listing.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod retry;
pub mod services;

pub use error::{DomainError, RepoError};
