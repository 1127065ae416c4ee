use serde::Deserialize;
use serde_json::Value;

pub const UNKNOWN_STATE: &str = "UNKNOWN";
pub const UNKNOWN_DEPLOYMENT_ID: &str = "unknown";

/// The nested `detail` object of the deployment state-change event. Every
/// field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentDetail {
    pub state: Option<String>,
    pub deployment_id: Option<String>,
    pub application_name: Option<String>,
    pub application_id: Option<String>,
    pub environment_name: Option<String>,
    pub environment_id: Option<String>,
}

/// Deployment event with every identifying field resolved to a value,
/// falling back to placeholders where the source omitted them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentEvent {
    pub state: String,
    pub deployment_id: String,
    pub application: String,
    pub environment: String,
}

pub fn deployment_event_from_payload(payload: &Value) -> DeploymentEvent {
    let detail: DeploymentDetail = payload
        .get("detail")
        .cloned()
        .map(serde_json::from_value)
        .and_then(Result::ok)
        .unwrap_or_default();

    DeploymentEvent {
        state: detail.state.unwrap_or_else(|| UNKNOWN_STATE.to_string()),
        deployment_id: detail
            .deployment_id
            .unwrap_or_else(|| UNKNOWN_DEPLOYMENT_ID.to_string()),
        application: detail
            .application_name
            .or(detail.application_id)
            .unwrap_or_default(),
        environment: detail
            .environment_name
            .or(detail.environment_id)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolves_all_fields_when_present() {
        let payload = json!({
            "detail": {
                "state": "DEPLOYMENT_COMPLETED",
                "deploymentId": "d-42",
                "applicationName": "edge-api",
                "environmentName": "production",
            }
        });

        assert_eq!(
            deployment_event_from_payload(&payload),
            DeploymentEvent {
                state: "DEPLOYMENT_COMPLETED".to_string(),
                deployment_id: "d-42".to_string(),
                application: "edge-api".to_string(),
                environment: "production".to_string(),
            }
        );
    }

    #[test]
    fn falls_back_to_ids_when_names_are_absent() {
        let payload = json!({
            "detail": {
                "state": "DEPLOYMENT_STARTED",
                "applicationId": "app-1",
                "environmentId": "env-2",
            }
        });

        let event = deployment_event_from_payload(&payload);
        assert_eq!(event.application, "app-1");
        assert_eq!(event.environment, "env-2");
        assert_eq!(event.deployment_id, UNKNOWN_DEPLOYMENT_ID);
    }

    #[test]
    fn defaults_everything_when_detail_is_missing() {
        let event = deployment_event_from_payload(&json!({}));

        assert_eq!(
            event,
            DeploymentEvent {
                state: UNKNOWN_STATE.to_string(),
                deployment_id: UNKNOWN_DEPLOYMENT_ID.to_string(),
                application: String::new(),
                environment: String::new(),
            }
        );
    }
}
