//! Shared plumbing for the food delivery workspace: logging setup, health
//! payloads and startup directory checks.

pub mod types;
pub mod utils;
pub mod env;
