use deploy_notifier_lambda::adapters::notify::Notifier;
use deploy_notifier_lambda::adapters::service_restart::ServiceRestarter;
use deploy_notifier_lambda::errors::{ActionError, NotificationError};
use deploy_notifier_lambda::handler::{handle_deployment_event, NotifierResponse};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct NotifierConfig {
    cluster: String,
    service: String,
    topic_arn: String,
}

impl NotifierConfig {
    fn from_env() -> Result<Self, Error> {
        let cluster = std::env::var("ECS_CLUSTER")
            .map_err(|_| Error::from("ECS_CLUSTER must be configured"))?;
        let service = std::env::var("ECS_SERVICE")
            .map_err(|_| Error::from("ECS_SERVICE must be configured"))?;
        let topic_arn = std::env::var("SNS_TOPIC_ARN")
            .map_err(|_| Error::from("SNS_TOPIC_ARN must be configured"))?;
        Ok(Self {
            cluster,
            service,
            topic_arn,
        })
    }
}

struct EcsServiceRestarter {
    ecs_client: aws_sdk_ecs::Client,
    cluster: String,
    service: String,
}

impl ServiceRestarter for EcsServiceRestarter {
    fn force_redeploy(&self) -> Result<(), ActionError> {
        let cluster = self.cluster.clone();
        let service = self.service.clone();
        let client = self.ecs_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .update_service()
                    .cluster(cluster)
                    .service(service)
                    .force_new_deployment(true)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| ActionError {
                        message: format!("failed to update ecs service: {error}"),
                    })
            })
        })
    }
}

struct SnsNotifier {
    sns_client: aws_sdk_sns::Client,
    topic_arn: String,
}

impl Notifier for SnsNotifier {
    fn publish(&self, subject: &str, message: &str) -> Result<(), NotificationError> {
        let topic_arn = self.topic_arn.clone();
        let subject = subject.to_string();
        let message = message.to_string();
        let client = self.sns_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .publish()
                    .topic_arn(topic_arn)
                    .subject(subject)
                    .message(message)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| NotificationError {
                        message: format!("failed to publish to sns: {error}"),
                    })
            })
        })
    }
}

async fn handle_request(
    restarter: &EcsServiceRestarter,
    notifier: &SnsNotifier,
    event: LambdaEvent<Value>,
) -> Result<NotifierResponse, Error> {
    let response = handle_deployment_event(&event.payload, restarter, notifier)?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = NotifierConfig::from_env()?;

    // Clients are built once at startup and reused across invocations.
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let restarter = EcsServiceRestarter {
        ecs_client: aws_sdk_ecs::Client::new(&aws_config),
        cluster: config.cluster,
        service: config.service,
    };
    let notifier = SnsNotifier {
        sns_client: aws_sdk_sns::Client::new(&aws_config),
        topic_arn: config.topic_arn,
    };

    let restarter_ref = &restarter;
    let notifier_ref = &notifier;
    lambda_runtime::run(service_fn(move |event| {
        handle_request(restarter_ref, notifier_ref, event)
    }))
    .await
}
