//! Core types and trait definitions for the Word Hero vocabulary backend.
//!
//! Words, users, word tags, pagination and the store traits. No HTTP and no
//! SQL live here; every other crate in the workspace builds on these types.

pub mod error;
pub mod page;
pub mod store;
pub mod tag;
pub mod user;
pub mod word;

pub use error::{Error, Result};

/// Current wall-clock time as epoch milliseconds, the unit of every
/// timestamp stored by Word Hero.
pub fn now_millis() -> i64 { chrono::Utc::now().timestamp_millis() }
