//! # postweek common library
//!
//! Shared code for the postweek service:
//! - Week-state derivation and payload types
//! - Remote date-source abstraction and implementations
//! - Data service (fetch + bucket + derive + cache)
//! - Configuration loading

pub mod config;
pub mod error;
pub mod service;
pub mod source;
pub mod weeks;

pub use error::{Error, Result};
pub use service::DataService;
pub use weeks::{DataPayload, WeekState};
