//! Mail delivery.

use lettre::transport::smtp::{self, SmtpTransport, authentication::Credentials};
use lettre::{Message, Transport};

use crate::error::{NotifyError, Result};

/// Delivers a finished message. One call per message, no retries.
pub trait MailTransport {
    fn deliver(&self, message: &Message) -> Result<()>;
}

/// Authenticated SMTP relay over implicit TLS.
pub struct SmtpRelay {
    transport: SmtpTransport,
}

impl SmtpRelay {
    pub fn new(host: &str, port: u16, username: &str, password: &str) -> Result<Self> {
        let transport = SmtpTransport::relay(host)
            .map_err(|e| classify(&e))?
            .port(port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();
        Ok(Self { transport })
    }
}

impl MailTransport for SmtpRelay {
    fn deliver(&self, message: &Message) -> Result<()> {
        self.transport.send(message).map_err(|e| classify(&e))?;
        Ok(())
    }
}

/// Reply codes meaning the credentials were refused.
const AUTH_REJECTED: &[&str] = &["530", "535"];

fn classify(err: &smtp::Error) -> NotifyError {
    let message = err.to_string();
    match err.status() {
        Some(code) if AUTH_REJECTED.contains(&code.to_string().as_str()) => {
            NotifyError::Auth { message }
        }
        _ => NotifyError::Transport { message },
    }
}
