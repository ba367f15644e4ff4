//! # portico-core
//!
//! Core types shared across Portico crates:
//! - [`Session`]: per-request identity derived from the Clerk session token
//! - [`ProfileFlag`]: the cached organization-membership flag kept in a
//!   user's Clerk public metadata

pub mod profile;
pub mod session;

pub use profile::ProfileFlag;
pub use session::Session;
