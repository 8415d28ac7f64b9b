//! # Explorer Common Library
//!
//! Shared code for the Explorer dashboard service:
//! - Production and failure record models
//! - Configuration loading and root folder resolution
//! - Calendar-day date normalization
//! - Error types

pub mod config;
pub mod dates;
pub mod error;
pub mod model;

pub use error::{Error, Result};
