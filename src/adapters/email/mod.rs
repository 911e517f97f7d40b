//! Email adapters.
//!
//! - `webhook_email_sender` - posts mail requests to automation webhooks
//! - `mock` - records mail in memory

mod mock;
mod webhook_email_sender;

pub use mock::{MailKind, MockEmailSender, SentMail};
pub use webhook_email_sender::WebhookEmailSender;
