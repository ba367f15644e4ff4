//! # portico-gate
//!
//! The per-request access gate.
//!
//! [`RoutingPolicy`] classifies a path as exempt, public, or protected.
//! [`Gate`] turns a path and a [`portico_core::Session`] into a [`Decision`],
//! consulting the identity provider only when the session leaves organization
//! membership undecided. [`middleware::gate_middleware`] wires both into axum.

pub mod error;
pub mod gate;
pub mod middleware;
pub mod policy;

pub use error::GateError;
pub use gate::{Decision, Gate, RedirectTarget};
pub use middleware::{GateState, gate_middleware};
pub use policy::{RouteClass, RouteRule, RoutingPolicy};
