//! Behavior of the notifier against a recording transport.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use lettre::Message;
use rpt_model::ReferencePeriod;
use rpt_notify::{
    DEFAULT_BODY, MailSettings, MailTransport, NotifyError, Notifier, SendOutcome, SendRequest,
};
use tempfile::TempDir;

/// Keeps every delivered message, or fails with a preset error.
#[derive(Clone, Default)]
struct Recording {
    sent: Rc<RefCell<Vec<String>>>,
    fail_auth: bool,
}

impl MailTransport for Recording {
    fn deliver(&self, message: &Message) -> rpt_notify::Result<()> {
        if self.fail_auth {
            return Err(NotifyError::Auth {
                message: "535 5.7.8 credentials rejected".to_string(),
            });
        }
        let text = String::from_utf8_lossy(&message.formatted()).into_owned();
        self.sent.borrow_mut().push(text);
        Ok(())
    }
}

fn notifier(transport: &Recording) -> Notifier {
    Notifier::new(
        MailSettings {
            sender: "reports@example.com".to_string(),
            sender_name: "Report Automation Team".to_string(),
        },
        Box::new(transport.clone()),
    )
}

fn request(recipients: &[&str], attachments: Vec<PathBuf>) -> SendRequest {
    SendRequest {
        recipients: recipients.iter().map(|s| (*s).to_string()).collect(),
        subject: "Sales {{year_month}}".to_string(),
        body: DEFAULT_BODY.to_string(),
        attachments,
        period: ReferencePeriod::new(2025, 6).unwrap(),
    }
}

#[test]
fn missing_attachments_never_reach_the_transport() {
    let dir = TempDir::new().unwrap();
    let transport = Recording::default();
    let outcome = notifier(&transport)
        .send(&request(
            &["ops@example.com"],
            vec![
                dir.path().join("customer_totals_2025_06.xlsx"),
                dir.path().join("daily_detail_2025_06.xlsx"),
            ],
        ))
        .unwrap();
    assert_eq!(outcome, SendOutcome::NoAttachments);
    assert!(transport.sent.borrow().is_empty());
}

#[test]
fn no_recipients_never_reach_the_transport() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("customer_totals_2025_06.xlsx");
    std::fs::write(&path, b"workbook").unwrap();
    let transport = Recording::default();
    let outcome = notifier(&transport).send(&request(&[], vec![path])).unwrap();
    assert_eq!(outcome, SendOutcome::NoRecipients);
    assert!(transport.sent.borrow().is_empty());
}

#[test]
fn existing_files_are_attached_and_missing_ones_skipped() {
    let dir = TempDir::new().unwrap();
    let present = dir.path().join("customer_totals_2025_06.xlsx");
    std::fs::write(&present, b"workbook bytes").unwrap();
    let missing = dir.path().join("daily_detail_2025_06.xlsx");

    let transport = Recording::default();
    let outcome = notifier(&transport)
        .send(&request(&["ops@example.com", "sales@example.com"], vec![present, missing]))
        .unwrap();
    assert_eq!(
        outcome,
        SendOutcome::Sent {
            recipients: 2,
            attachments: 1
        }
    );

    let sent = transport.sent.borrow();
    assert_eq!(sent.len(), 1);
    let mail = &sent[0];
    assert!(mail.contains("Subject: Sales 2025_06"));
    assert!(mail.contains("customer_totals_2025_06.xlsx"));
    assert!(!mail.contains("daily_detail_2025_06.xlsx"));
    assert!(mail.contains("June 2025"));
}

#[test]
fn invalid_recipient_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("r.xlsx");
    std::fs::write(&path, b"x").unwrap();
    let transport = Recording::default();
    let err = notifier(&transport)
        .send(&request(&["ops at example"], vec![path]))
        .unwrap_err();
    assert!(matches!(err, NotifyError::InvalidAddress { .. }));
    assert!(transport.sent.borrow().is_empty());
}

#[test]
fn transport_errors_propagate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("r.xlsx");
    std::fs::write(&path, b"x").unwrap();
    let transport = Recording {
        fail_auth: true,
        ..Recording::default()
    };
    let err = notifier(&transport)
        .send(&request(&["ops@example.com"], vec![path]))
        .unwrap_err();
    assert!(matches!(err, NotifyError::Auth { .. }));
}
