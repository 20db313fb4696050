//! Storage implementations for the service layer.

pub mod json_user_store;

pub use json_user_store::JsonUserStore;
