//! Service layer for user accounts.
//! - Keeps registration and login rules independent of the web framework.
//! - Persists through the `UserRepository` seam (sea-orm or in-memory).
//! - Provides clear error types and documented interfaces.

pub mod auth;
