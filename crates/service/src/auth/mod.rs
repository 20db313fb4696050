//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and listing over the persisted user collection.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;

pub use service::UserService;
