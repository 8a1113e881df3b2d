//! Composing and sending report mail.

use std::path::{Path, PathBuf};

use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use rpt_model::ReferencePeriod;
use tracing::{debug, info, info_span, warn};

use crate::error::{NotifyError, Result};
use crate::template::TemplateContext;
use crate::transport::MailTransport;

/// Sender identity shared by every message of a run.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub sender: String,
    /// Display name; also replaces `[sender_name]` in bodies.
    pub sender_name: String,
}

/// One outgoing message before placeholders are resolved.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<PathBuf>,
    pub period: ReferencePeriod,
}

/// What happened to a send request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nobody to send to; nothing was read or sent.
    NoRecipients,
    /// None of the attachment files could be read; nothing was sent.
    NoAttachments,
    Sent {
        recipients: usize,
        attachments: usize,
    },
}

/// A file read from disk, ready to attach.
#[derive(Debug, Clone)]
pub struct AttachmentFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

pub struct Notifier {
    settings: MailSettings,
    transport: Box<dyn MailTransport>,
}

impl Notifier {
    pub fn new(settings: MailSettings, transport: Box<dyn MailTransport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    /// Renders, attaches and delivers one message.
    pub fn send(&self, request: &SendRequest) -> Result<SendOutcome> {
        let span = info_span!(
            "notify",
            recipients = request.recipients.len(),
            files = request.attachments.len()
        );
        let _guard = span.enter();

        if request.recipients.is_empty() {
            warn!("no recipients configured, mail not sent");
            return Ok(SendOutcome::NoRecipients);
        }

        let files = read_attachments(&request.attachments);
        if files.is_empty() {
            warn!("no report file could be attached, mail not sent");
            return Ok(SendOutcome::NoAttachments);
        }

        let names: Vec<String> = files.iter().map(|f| f.file_name.clone()).collect();
        let context = TemplateContext {
            period: request.period,
            attachments: &names,
            sender_name: &self.settings.sender_name,
            recipients: &request.recipients,
        };
        let subject = context.render_subject(&request.subject);
        let body = context.render_body(&request.body);

        let message = compose_message(&self.settings, &request.recipients, &subject, body, files)?;
        info!(subject = %subject, "sending mail");
        self.transport.deliver(&message)?;
        info!(
            recipients = request.recipients.len(),
            attachments = names.len(),
            "mail sent"
        );

        Ok(SendOutcome::Sent {
            recipients: request.recipients.len(),
            attachments: names.len(),
        })
    }
}

/// Reads every attachment that exists. Unreadable files are skipped.
pub fn read_attachments(paths: &[PathBuf]) -> Vec<AttachmentFile> {
    paths
        .iter()
        .filter_map(|path| read_attachment(path))
        .collect()
}

fn read_attachment(path: &Path) -> Option<AttachmentFile> {
    let file_name = path.file_name()?.to_string_lossy().into_owned();
    match std::fs::read(path) {
        Ok(content) => {
            debug!(file = %file_name, bytes = content.len(), "attached report");
            Some(AttachmentFile { file_name, content })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "attachment not found, skipped");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "attachment unreadable, skipped");
            None
        }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| NotifyError::InvalidAddress {
            address: address.to_string(),
            message: e.to_string(),
        })
}

/// Builds a plain-text message with every file attached as
/// `application/octet-stream`.
pub fn compose_message(
    settings: &MailSettings,
    recipients: &[String],
    subject: &str,
    body: String,
    files: Vec<AttachmentFile>,
) -> Result<Message> {
    let mut from = parse_mailbox(&settings.sender)?;
    if !settings.sender_name.trim().is_empty() {
        from.name = Some(settings.sender_name.clone());
    }

    let mut builder = Message::builder().from(from).subject(subject);
    for recipient in recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    let octet_stream =
        ContentType::parse("application/octet-stream").map_err(|e| NotifyError::Build {
            message: e.to_string(),
        })?;
    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(body));
    for file in files {
        let attachment = Attachment::new(file.file_name).body(file.content, octet_stream.clone());
        parts = parts.singlepart(attachment);
    }

    Ok(builder.multipart(parts)?)
}
