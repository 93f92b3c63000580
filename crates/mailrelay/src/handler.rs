use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::error::RelayError;
use crate::mailer::Mailer;
use crate::message::{ContactSubmission, Letterhead, OutboundEmail, ValidSubmission};

const SUCCESS_MESSAGE: &str = "Message sent and auto-reply sent.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

/// Handles one `POST /send` invocation from an API Gateway (REST or HTTP API)
/// or function-URL envelope.
pub async fn handle_contact_event(
    event: Value,
    letterhead: &Letterhead,
    mailer: &dyn Mailer,
) -> ApiGatewayResponse {
    match process(event, letterhead, mailer).await {
        Ok(()) => success_response(),
        Err(err) => {
            if let RelayError::Delivery(cause) = &err {
                error!(error = %cause, "error sending email");
            }
            error_response(&err)
        }
    }
}

async fn process(
    event: Value,
    letterhead: &Letterhead,
    mailer: &dyn Mailer,
) -> Result<(), RelayError> {
    let method = request_method(&event);
    if method != Some("POST") {
        return Err(RelayError::MethodNotAllowed(method.map(str::to_string)));
    }

    let payload = normalize_apigw_event(event).map_err(RelayError::Validation)?;
    let submission = serde_json::from_value::<ContactSubmission>(payload)
        .map_err(|err| RelayError::Validation(format!("malformed request: {err}")))?
        .validate()?;

    deliver(&submission, letterhead, mailer).await
}

/// Sends the operator notification, then the auto-reply. The first failure
/// ends the request; the auto-reply is never attempted after a failed
/// notification.
pub async fn deliver(
    submission: &ValidSubmission,
    letterhead: &Letterhead,
    mailer: &dyn Mailer,
) -> Result<(), RelayError> {
    mailer
        .send(&OutboundEmail::notification(submission, letterhead))
        .await?;
    mailer
        .send(&OutboundEmail::auto_reply(submission, letterhead))
        .await?;
    info!(name = %submission.name, "contact message relayed");
    Ok(())
}

fn request_method(event: &Value) -> Option<&str> {
    event
        .get("httpMethod")
        .and_then(Value::as_str)
        .or_else(|| event.pointer("/requestContext/http/method").and_then(Value::as_str))
}

fn normalize_apigw_event(event: Value) -> Result<Value, String> {
    let Some(object) = event.as_object() else {
        return Err("request payload must be a JSON object".to_string());
    };

    let Some(body) = object.get("body") else {
        return Ok(event);
    };

    match body {
        Value::Null => Ok(json!({})),
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) => {
            serde_json::from_str(text).map_err(|error| format!("malformed JSON body: {error}"))
        }
        _ => Err("request body must be a JSON object".to_string()),
    }
}

fn success_response() -> ApiGatewayResponse {
    response(200, json!({ "success": true, "message": SUCCESS_MESSAGE }))
}

fn error_response(err: &RelayError) -> ApiGatewayResponse {
    response(err.status_code(), json!({ "error": err.public_message() }))
}

fn response(status_code: u16, payload: Value) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body: payload.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::DeliveryError;

    struct CapturingMailer {
        sent: Mutex<Vec<OutboundEmail>>,
        fail_on_call: Option<usize>,
    }

    impl CapturingMailer {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_on_call: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_on_call: Some(call),
            }
        }

        fn sent(&self) -> Vec<OutboundEmail> {
            self.sent.lock().expect("poisoned mutex").clone()
        }
    }

    #[async_trait]
    impl Mailer for CapturingMailer {
        async fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
            let mut sent = self.sent.lock().expect("poisoned mutex");
            sent.push(email.clone());
            if self.fail_on_call == Some(sent.len()) {
                return Err(DeliveryError::Transport("connection reset".into()));
            }
            Ok(())
        }
    }

    fn letterhead() -> Letterhead {
        Letterhead {
            operator_address: "studio@example.com".into(),
            signature: "Nixate Studio".into(),
        }
    }

    fn rest_event(method: &str, body: Value) -> Value {
        json!({
            "httpMethod": method,
            "path": "/send",
            "body": body.to_string(),
        })
    }

    fn complete_body() -> Value {
        json!({"name": "Ada", "email": "ada@example.com", "message": "Hello"})
    }

    fn body_of(response: &ApiGatewayResponse) -> Value {
        serde_json::from_str(&response.body).expect("body should be JSON")
    }

    #[tokio::test]
    async fn rejects_non_post_methods() {
        let mailer = CapturingMailer::new();
        for method in ["GET", "PUT", "DELETE", "OPTIONS"] {
            let response =
                handle_contact_event(rest_event(method, complete_body()), &letterhead(), &mailer)
                    .await;
            assert_eq!(response.status_code, 405);
            assert_eq!(
                body_of(&response),
                json!({"error": "Only POST requests allowed"})
            );
        }
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn missing_method_is_not_allowed() {
        let mailer = CapturingMailer::new();
        let response = handle_contact_event(complete_body(), &letterhead(), &mailer).await;
        assert_eq!(response.status_code, 405);
    }

    #[tokio::test]
    async fn missing_or_empty_fields_fail_before_sending() {
        let mailer = CapturingMailer::new();
        let bodies = [
            json!({"email": "ada@example.com", "message": "Hello"}),
            json!({"name": "Ada", "email": "", "message": "Hello"}),
            json!({"name": "Ada", "email": "ada@example.com", "message": ""}),
            json!({"name": null, "email": "ada@example.com", "message": "Hello"}),
            json!({}),
        ];
        for body in bodies {
            let response =
                handle_contact_event(rest_event("POST", body), &letterhead(), &mailer).await;
            assert_eq!(response.status_code, 400);
            assert_eq!(body_of(&response), json!({"error": "All fields are required."}));
        }
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn whitespace_only_fields_are_still_sent() {
        let mailer = CapturingMailer::new();
        let body = json!({"name": "Ada", "email": "ada@example.com", "message": "   "});
        let response =
            handle_contact_event(rest_event("POST", body), &letterhead(), &mailer).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(mailer.sent().len(), 2);
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let mailer = CapturingMailer::new();
        let event = json!({"httpMethod": "POST", "body": "{not json"});
        let response = handle_contact_event(event, &letterhead(), &mailer).await;
        assert_eq!(response.status_code, 400);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn sends_notification_then_auto_reply() {
        let mailer = CapturingMailer::new();
        let response =
            handle_contact_event(rest_event("POST", complete_body()), &letterhead(), &mailer)
                .await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers["Content-Type"], "application/json");
        assert_eq!(
            body_of(&response),
            json!({"success": true, "message": "Message sent and auto-reply sent."})
        );

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "studio@example.com");
        assert_eq!(sent[0].from, "ada@example.com");
        assert_eq!(sent[1].to, "ada@example.com");
        assert_eq!(sent[1].from, "studio@example.com");
    }

    #[tokio::test]
    async fn accepts_http_api_envelope_with_object_body() {
        let mailer = CapturingMailer::new();
        let event = json!({
            "requestContext": {"http": {"method": "POST", "path": "/send"}},
            "body": complete_body(),
        });
        let response = handle_contact_event(event, &letterhead(), &mailer).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(mailer.sent().len(), 2);
    }

    #[tokio::test]
    async fn first_send_failure_stops_the_request() {
        let mailer = CapturingMailer::failing_on(1);
        let response =
            handle_contact_event(rest_event("POST", complete_body()), &letterhead(), &mailer)
                .await;
        assert_eq!(response.status_code, 500);
        assert_eq!(
            body_of(&response),
            json!({"error": "Something went wrong while sending your message."})
        );
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn auto_reply_failure_is_reported_after_both_attempts() {
        let mailer = CapturingMailer::failing_on(2);
        let response =
            handle_contact_event(rest_event("POST", complete_body()), &letterhead(), &mailer)
                .await;
        assert_eq!(response.status_code, 500);
        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].subject, "New Contact Message from Ada");
    }
}
