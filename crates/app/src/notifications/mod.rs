//! Transactional email.
//!
//! Services hand finished emails to a [`Mailer`] after their transaction
//! commits. Delivery failures are logged and reported as `false`; they never
//! fail the operation that triggered them.

mod brevo;
mod emblue;
mod mailer;
mod notifier;
pub mod templates;

pub use brevo::BrevoMailer;
pub use emblue::EmblueMailer;
pub use mailer::*;
pub use notifier::Notifier;
