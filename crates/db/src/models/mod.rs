//! Database entity and DTO types.

pub mod receipt;
