//! Shared test infrastructure.


pub(crate) use context::{TestContext, region};
pub(crate) use mailer::RecordingMailer;
