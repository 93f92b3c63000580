//! Contact-form mail relay.
//!
//! `handle_contact_event` takes a raw API Gateway event, checks the method,
//! validates the submission, and asks a [`Mailer`] for two sequential sends:
//! the operator notification first, then the auto-reply to the submitter.
//! Responses carry fixed JSON bodies; delivery details are only logged.

pub mod config;
pub mod error;
pub mod handler;
pub mod mailer;
pub mod message;

pub use config::{RelayConfig, RelayConfigError};
pub use error::{DeliveryError, RelayError};
pub use handler::{deliver, handle_contact_event, ApiGatewayResponse};
pub use mailer::{HttpMailer, Mailer};
pub use message::{ContactSubmission, Letterhead, OutboundEmail, ValidSubmission};
