//! Report mail: template substitution, message composition and delivery.

pub mod error;
pub mod notifier;
pub mod template;
pub mod transport;

pub use error::{NotifyError, Result};
pub use notifier::{
    AttachmentFile, MailSettings, Notifier, SendOutcome, SendRequest, compose_message,
    read_attachments,
};
pub use template::{DEFAULT_BODY, DEFAULT_SUBJECT, TemplateContext};
pub use transport::{MailTransport, SmtpRelay};
