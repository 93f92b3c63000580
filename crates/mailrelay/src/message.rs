use serde::{Deserialize, Serialize};

use crate::error::RelayError;

const AUTO_REPLY_SUBJECT: &str = "Thanks for contacting us!";

/// Form payload as received. Every field may be absent on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A submission with all three fields present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn validate(self) -> Result<ValidSubmission, RelayError> {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|text| !text.is_empty())
        }

        match (present(self.name), present(self.email), present(self.message)) {
            (Some(name), Some(email), Some(message)) => Ok(ValidSubmission {
                name,
                email,
                message,
            }),
            (name, email, message) => {
                let missing: Vec<&str> = [
                    ("name", name.is_none()),
                    ("email", email.is_none()),
                    ("message", message.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                Err(RelayError::Validation(format!("missing {}", missing.join(", "))))
            }
        }
    }
}

/// Operator identity stamped onto outgoing mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letterhead {
    pub operator_address: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
}

impl OutboundEmail {
    /// Message to the operator, authored as the submitter.
    pub fn notification(submission: &ValidSubmission, letterhead: &Letterhead) -> Self {
        Self {
            from: submission.email.clone(),
            to: letterhead.operator_address.clone(),
            reply_to: Some(submission.email.clone()),
            subject: format!("New Contact Message from {}", submission.name),
            text: format!(
                "Name: {}\nEmail: {}\n\nMessage:\n{}\n",
                submission.name, submission.email, submission.message
            ),
        }
    }

    /// Fixed thank-you sent back to the submitter.
    pub fn auto_reply(submission: &ValidSubmission, letterhead: &Letterhead) -> Self {
        Self {
            from: letterhead.operator_address.clone(),
            to: submission.email.clone(),
            reply_to: None,
            subject: AUTO_REPLY_SUBJECT.to_string(),
            text: format!(
                "Hi {},\n\nThank you for reaching out! We’ve received your message and will respond shortly.\n\n— {}",
                submission.name, letterhead.signature
            ),
        }
    }
}
