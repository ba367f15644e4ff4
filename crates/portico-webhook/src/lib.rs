//! # portico-webhook
//!
//! Receives Clerk webhook deliveries and keeps the `hasOrganization` profile
//! flag in step with organization-membership events.
//!
//! - [`verify`]: svix signature verification over the raw request body
//! - [`event`]: the event envelope and the payload shapes Portico reads
//! - [`dispatch`]: the event-type dispatch table and its handlers
//! - [`handler`]: the axum endpoint tying them together

pub mod dispatch;
pub mod error;
pub mod event;
pub mod handler;
pub mod verify;

pub use dispatch::{EventDispatcher, EventHandler, Outcome};
pub use error::WebhookError;
pub use event::WebhookEvent;
pub use handler::{WEBHOOK_PATH, WebhookState, clerk_webhook};
pub use verify::{SvixHeaders, VerifyError, Webhook};
