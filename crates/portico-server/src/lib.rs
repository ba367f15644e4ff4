//! # portico-server
//!
//! Router assembly for the `portico` binary. Split out of `main.rs` so the
//! full stack can be exercised in integration tests with in-memory Clerk
//! stand-ins.

pub mod app;

pub use app::{Services, router};
