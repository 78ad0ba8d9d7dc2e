//! CLI command implementations.

pub mod check_gatemap;
pub mod gatemap;
pub mod replay;
pub mod version;
