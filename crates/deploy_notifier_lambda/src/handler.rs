use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapters::notify::Notifier;
use crate::adapters::service_restart::ServiceRestarter;
use crate::errors::NotifierError;
use crate::event::deployment_event_from_payload;

/// States that mean the configuration rollout finished and the service
/// should be cycled to pick it up.
pub const SUCCESS_STATES: &[&str] = &["DEPLOYMENT_COMPLETED"];

pub const ERROR_STATES: &[&str] = &["DEPLOYMENT_FAILED", "DEPLOYMENT_ROLLED_BACK", "ROLLED_BACK"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotifierResponse {
    pub status: String,
    pub state: String,
}

/// Classifies the reported deployment state, triggers the rolling
/// redeployment on success, and publishes the notification in every case.
pub fn handle_deployment_event(
    payload: &Value,
    restarter: &impl ServiceRestarter,
    notifier: &impl Notifier,
) -> Result<NotifierResponse, NotifierError> {
    let event = deployment_event_from_payload(payload);
    log_notifier_info(
        "deployment_event_received",
        json!({
            "state": event.state.clone(),
            "deployment_id": event.deployment_id.clone(),
        }),
    );

    let mut message_lines = vec![
        format!("Application: {}", event.application),
        format!("Environment: {}", event.environment),
        format!("Deployment ID: {}", event.deployment_id),
        format!("State: {}", event.state),
    ];

    let subject = if SUCCESS_STATES.contains(&event.state.as_str()) {
        restarter.force_redeploy()?;
        log_notifier_info(
            "rolling_update_triggered",
            json!({"deployment_id": event.deployment_id.clone()}),
        );
        message_lines
            .push("Triggered ECS service rolling update to pick up new configuration.".to_string());
        "AppConfig deployment succeeded".to_string()
    } else if ERROR_STATES.contains(&event.state.as_str()) {
        message_lines
            .push("Deployment reported failure. Please investigate and re-deploy if needed.".to_string());
        "AppConfig deployment failed".to_string()
    } else {
        message_lines.push("State is informational; no action taken automatically.".to_string());
        format!("AppConfig deployment state: {}", event.state)
    };

    notifier.publish(&subject, &message_lines.join("\n"))?;
    log_notifier_info("notification_published", json!({"subject": subject}));

    Ok(NotifierResponse {
        status: "ok".to_string(),
        state: event.state,
    })
}

fn log_notifier_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "deploy_notifier",
            "event": event,
            "timestamp": Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::errors::{ActionError, NotificationError};

    struct RecordingRestarter {
        calls: Mutex<usize>,
        fail: bool,
    }

    impl RecordingRestarter {
        fn new() -> Self {
            Self {
                calls: Mutex::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(0),
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().expect("poisoned mutex")
        }
    }

    impl ServiceRestarter for RecordingRestarter {
        fn force_redeploy(&self) -> Result<(), ActionError> {
            *self.calls.lock().expect("poisoned mutex") += 1;
            if self.fail {
                return Err(ActionError {
                    message: "simulated update rejection".to_string(),
                });
            }
            Ok(())
        }
    }

    struct RecordingNotifier {
        published: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                published: Mutex::new(Vec::new()),
            }
        }

        fn published(&self) -> Vec<(String, String)> {
            self.published.lock().expect("poisoned mutex").clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn publish(&self, subject: &str, message: &str) -> Result<(), NotificationError> {
            self.published
                .lock()
                .expect("poisoned mutex")
                .push((subject.to_string(), message.to_string()));
            Ok(())
        }
    }

    struct RejectingNotifier;

    impl Notifier for RejectingNotifier {
        fn publish(&self, _subject: &str, _message: &str) -> Result<(), NotificationError> {
            Err(NotificationError {
                message: "simulated publish rejection".to_string(),
            })
        }
    }

    fn completed_event() -> Value {
        json!({
            "detail": {
                "state": "DEPLOYMENT_COMPLETED",
                "deploymentId": "d-42",
                "applicationName": "edge-api",
                "environmentName": "production",
            }
        })
    }

    #[test]
    fn completed_deployment_triggers_one_rolling_update() {
        let restarter = RecordingRestarter::new();
        let notifier = RecordingNotifier::new();

        let response = handle_deployment_event(&completed_event(), &restarter, &notifier)
            .expect("handler should succeed");

        assert_eq!(restarter.calls(), 1);
        assert_eq!(response.status, "ok");
        assert_eq!(response.state, "DEPLOYMENT_COMPLETED");

        let published = notifier.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "AppConfig deployment succeeded");
        assert_eq!(
            published[0].1,
            "Application: edge-api\n\
             Environment: production\n\
             Deployment ID: d-42\n\
             State: DEPLOYMENT_COMPLETED\n\
             Triggered ECS service rolling update to pick up new configuration."
        );
    }

    #[test]
    fn failed_deployment_notifies_without_redeploying() {
        for state in ["DEPLOYMENT_FAILED", "DEPLOYMENT_ROLLED_BACK", "ROLLED_BACK"] {
            let restarter = RecordingRestarter::new();
            let notifier = RecordingNotifier::new();
            let payload = json!({"detail": {"state": state, "deploymentId": "d-7"}});

            let response = handle_deployment_event(&payload, &restarter, &notifier)
                .expect("handler should succeed");

            assert_eq!(restarter.calls(), 0);
            assert_eq!(response.state, state);

            let published = notifier.published();
            assert_eq!(published.len(), 1);
            assert_eq!(published[0].0, "AppConfig deployment failed");
            assert!(published[0]
                .1
                .ends_with("Deployment reported failure. Please investigate and re-deploy if needed."));
        }
    }

    #[test]
    fn missing_state_defaults_to_unknown_and_takes_no_action() {
        let restarter = RecordingRestarter::new();
        let notifier = RecordingNotifier::new();

        let response = handle_deployment_event(&json!({"detail": {}}), &restarter, &notifier)
            .expect("handler should succeed");

        assert_eq!(restarter.calls(), 0);
        assert_eq!(
            response,
            NotifierResponse {
                status: "ok".to_string(),
                state: "UNKNOWN".to_string(),
            }
        );

        let published = notifier.published();
        assert_eq!(published[0].0, "AppConfig deployment state: UNKNOWN");
        assert!(published[0]
            .1
            .ends_with("State is informational; no action taken automatically."));
    }

    #[test]
    fn missing_identifiers_default_to_placeholders_in_the_body() {
        let restarter = RecordingRestarter::new();
        let notifier = RecordingNotifier::new();
        let payload = json!({"detail": {"state": "DEPLOYMENT_STARTED"}});

        handle_deployment_event(&payload, &restarter, &notifier)
            .expect("handler should succeed");

        let published = notifier.published();
        assert!(published[0].1.starts_with(
            "Application: \n\
             Environment: \n\
             Deployment ID: unknown\n\
             State: DEPLOYMENT_STARTED"
        ));
    }

    #[test]
    fn rejected_redeploy_propagates_before_publishing() {
        let restarter = RecordingRestarter::failing();
        let notifier = RecordingNotifier::new();

        let error = handle_deployment_event(&completed_event(), &restarter, &notifier)
            .expect_err("rejected update should fail the invocation");

        assert!(matches!(error, NotifierError::Action(_)));
        assert!(notifier.published().is_empty());
    }

    #[test]
    fn rejected_publish_propagates() {
        let restarter = RecordingRestarter::new();

        let error = handle_deployment_event(
            &json!({"detail": {"state": "DEPLOYMENT_STARTED"}}),
            &restarter,
            &RejectingNotifier,
        )
        .expect_err("rejected publish should fail the invocation");

        assert!(matches!(error, NotifierError::Notification(_)));
    }
}
