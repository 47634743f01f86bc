//! Pure domain logic for the Receipt Vault backend.
//!
//! Receipt drafts, the validation engine, and spending analytics live here.
//! Nothing in this crate touches a database or the network; callers supply
//! data and collaborator lookups explicitly.

pub mod analytics;
pub mod error;
pub mod receipt;
pub mod types;
pub mod validation;
