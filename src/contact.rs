use crate::error::{UnveilError, UnveilResult};

/// Seconds a terminal submit status stays visible before clearing back to
/// idle.
pub const STATUS_WINDOW_S: f64 = 5.0;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContactFields {
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub body: String,
}

/// One of the form's inputs, for per-field flourishes like the floating
/// label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactField {
    SenderName,
    SenderEmail,
    Subject,
    Body,
}

pub const CONTACT_FIELDS: [ContactField; 4] = [
    ContactField::SenderName,
    ContactField::SenderEmail,
    ContactField::Subject,
    ContactField::Body,
];

impl ContactField {
    /// Stable fragment used in the field's stage element keys.
    pub fn key(self) -> &'static str {
        match self {
            Self::SenderName => "name",
            Self::SenderEmail => "email",
            Self::Subject => "subject",
            Self::Body => "body",
        }
    }
}

impl ContactFields {
    pub fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::SenderName => &self.sender_name,
            ContactField::SenderEmail => &self.sender_email,
            ContactField::Subject => &self.subject,
            ContactField::Body => &self.body,
        }
    }
}

/// Snapshot of the fields handed to the delivery collaborator. Taken at
/// submit time so later edits to the form cannot race the send.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ContactMessage {
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub body: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed,
}

/// The outbound side of the contact form. Implementations may block; the
/// form only cares about the outcome. Errors count as failed deliveries and
/// are absorbed at the submission boundary.
pub trait MessageDelivery {
    fn deliver(&mut self, message: &ContactMessage) -> UnveilResult<DeliveryOutcome>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Sending,
    Sent,
    Failed,
}

/// Contact form state machine: idle -> sending -> sent/failed -> idle.
///
/// Field edits are plain mutations through `fields`; the form only guards
/// the submission lifecycle. A delivered submission clears the fields, a
/// failed one keeps them for retry, and either terminal status clears
/// itself [`STATUS_WINDOW_S`] after it was set.
#[derive(Debug, Default)]
pub struct ContactForm {
    pub fields: ContactFields,
    status: SubmitStatus,
    status_until_s: Option<f64>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    /// False while a submission is in flight; hosts disable the submit
    /// control off this.
    pub fn can_submit(&self) -> bool {
        self.status != SubmitStatus::Sending
    }

    pub fn validate(&self) -> UnveilResult<()> {
        let required = [
            ("sender name", &self.fields.sender_name),
            ("sender email", &self.fields.sender_email),
            ("subject", &self.fields.subject),
            ("body", &self.fields.body),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(UnveilError::validation(format!("{name} is required")));
            }
        }
        let email = self.fields.sender_email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(UnveilError::validation("sender email must contain '@'")),
        }
    }

    /// Validates and moves to `Sending`, returning the snapshot to deliver.
    /// Rejected while another submission is in flight.
    pub fn begin_submit(&mut self, _now_s: f64) -> UnveilResult<ContactMessage> {
        if self.status == SubmitStatus::Sending {
            return Err(UnveilError::validation("a submission is already in flight"));
        }
        self.validate()?;
        self.status = SubmitStatus::Sending;
        self.status_until_s = None;
        Ok(ContactMessage {
            sender_name: self.fields.sender_name.clone(),
            sender_email: self.fields.sender_email.clone(),
            subject: self.fields.subject.clone(),
            body: self.fields.body.clone(),
        })
    }

    /// Records the outcome of the in-flight submission and arms the status
    /// auto-clear.
    pub fn finish_submit(&mut self, outcome: DeliveryOutcome, now_s: f64) {
        match outcome {
            DeliveryOutcome::Delivered => {
                self.fields = ContactFields::default();
                self.status = SubmitStatus::Sent;
            }
            DeliveryOutcome::Failed => {
                // Fields stay put so the visitor can retry.
                self.status = SubmitStatus::Failed;
            }
        }
        self.status_until_s = Some(now_s + STATUS_WINDOW_S);
    }

    /// Runs a whole submission through `delivery` synchronously. Collaborator
    /// errors are logged and folded into a failed outcome; only validation
    /// problems surface as `Err`.
    pub fn submit_via(
        &mut self,
        delivery: &mut dyn MessageDelivery,
        now_s: f64,
    ) -> UnveilResult<SubmitStatus> {
        let message = self.begin_submit(now_s)?;
        let outcome = match delivery.deliver(&message) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(error = %err, "message delivery failed");
                DeliveryOutcome::Failed
            }
        };
        self.finish_submit(outcome, now_s);
        Ok(self.status)
    }

    /// Clears a terminal status once its window has elapsed.
    pub fn tick(&mut self, now_s: f64) {
        if let Some(until) = self.status_until_s {
            if now_s >= until && matches!(self.status, SubmitStatus::Sent | SubmitStatus::Failed) {
                self.status = SubmitStatus::Idle;
                self.status_until_s = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Accepting;
    impl MessageDelivery for Accepting {
        fn deliver(&mut self, _message: &ContactMessage) -> UnveilResult<DeliveryOutcome> {
            Ok(DeliveryOutcome::Delivered)
        }
    }

    struct Refusing;
    impl MessageDelivery for Refusing {
        fn deliver(&mut self, _message: &ContactMessage) -> UnveilResult<DeliveryOutcome> {
            Ok(DeliveryOutcome::Failed)
        }
    }

    struct Broken;
    impl MessageDelivery for Broken {
        fn deliver(&mut self, _message: &ContactMessage) -> UnveilResult<DeliveryOutcome> {
            Err(UnveilError::delivery("transport exploded"))
        }
    }

    fn filled() -> ContactForm {
        let mut form = ContactForm::new();
        form.fields = ContactFields {
            sender_name: "Mira".into(),
            sender_email: "mira@example.com".into(),
            subject: "Hello".into(),
            body: "Interested in working together.".into(),
        };
        form
    }

    #[test]
    fn delivered_submission_clears_fields_and_reports_sent() {
        let mut form = filled();
        let status = form.submit_via(&mut Accepting, 10.0).unwrap();
        assert_eq!(status, SubmitStatus::Sent);
        assert_eq!(form.fields, ContactFields::default());

        // Status holds through the window, then clears.
        form.tick(10.0 + STATUS_WINDOW_S - 0.1);
        assert_eq!(form.status(), SubmitStatus::Sent);
        form.tick(10.0 + STATUS_WINDOW_S);
        assert_eq!(form.status(), SubmitStatus::Idle);
    }

    #[test]
    fn failed_submission_keeps_fields_for_retry() {
        let mut form = filled();
        let before = form.fields.clone();
        let status = form.submit_via(&mut Refusing, 0.0).unwrap();
        assert_eq!(status, SubmitStatus::Failed);
        assert_eq!(form.fields, before);
        form.tick(STATUS_WINDOW_S);
        assert_eq!(form.status(), SubmitStatus::Idle);
    }

    #[test]
    fn transport_errors_fold_into_failed() {
        let mut form = filled();
        let status = form.submit_via(&mut Broken, 0.0).unwrap();
        assert_eq!(status, SubmitStatus::Failed);
    }

    #[test]
    fn double_submit_is_rejected_while_in_flight() {
        let mut form = filled();
        form.begin_submit(0.0).unwrap();
        assert!(!form.can_submit());
        let err = form.begin_submit(0.1).unwrap_err();
        assert!(err.to_string().contains("already in flight"));

        form.finish_submit(DeliveryOutcome::Failed, 0.2);
        assert!(form.can_submit());
        assert!(form.begin_submit(0.3).is_ok());
    }

    #[test]
    fn validation_rejects_missing_and_malformed_fields() {
        let mut form = ContactForm::new();
        assert!(form.begin_submit(0.0).is_err());
        assert_eq!(form.status(), SubmitStatus::Idle);

        form.fields = ContactFields {
            sender_name: "Mira".into(),
            sender_email: "not-an-email".into(),
            subject: "Hi".into(),
            body: "Text".into(),
        };
        let err = form.begin_submit(0.0).unwrap_err();
        assert!(err.to_string().contains("'@'"));
    }

    #[test]
    fn snapshot_is_taken_at_submit_time() {
        let mut form = filled();
        let message = form.begin_submit(0.0).unwrap();
        form.fields.subject = "Edited mid-flight".into();
        assert_eq!(message.subject, "Hello");
    }
}
