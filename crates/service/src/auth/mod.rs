//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Password hashing and token signing live beside the service so the
//! handlers only ever see an `AuthSession` or an `AuthError`.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;
pub mod validation;

pub use errors::AuthError;
pub use service::AuthService;
