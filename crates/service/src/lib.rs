//! Service layer for the user authentication API.
//! - Separates business logic from the HTTP layer.
//! - Persists users through the `UserRepository` seam.
//! - Provides clear error types and documented interfaces.

pub mod auth;
pub mod errors;
pub mod storage;
