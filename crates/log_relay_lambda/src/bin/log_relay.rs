use aws_lambda_events::event::s3::S3Event;
use aws_sdk_cloudwatchlogs::types::InputLogEvent;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use log_relay_lambda::adapters::log_sink::{LogLineEvent, LogSink, StreamSetup};
use log_relay_lambda::adapters::object_fetch::ObjectFetcher;
use log_relay_lambda::errors::{AppendError, FetchError, StreamSetupError};
use log_relay_lambda::event::object_refs_from_event;
use log_relay_lambda::handler::{handle_event, RelayConfig};

struct S3ObjectFetcher {
    s3_client: aws_sdk_s3::Client,
}

impl ObjectFetcher for S3ObjectFetcher {
    fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, FetchError> {
        let bucket = bucket.to_string();
        let object_key = key.to_string();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let object = client
                    .get_object()
                    .bucket(bucket)
                    .key(object_key)
                    .send()
                    .await
                    .map_err(|error| FetchError {
                        message: format!("failed to get object from s3: {error}"),
                    })?;
                let body = object.body.collect().await.map_err(|error| FetchError {
                    message: format!("failed to read object body from s3: {error}"),
                })?;
                Ok(body.into_bytes().to_vec())
            })
        })
    }
}

struct CloudWatchLogSink {
    logs_client: aws_sdk_cloudwatchlogs::Client,
    log_group: String,
}

impl LogSink for CloudWatchLogSink {
    fn ensure_stream(&self, stream_name: &str) -> Result<StreamSetup, StreamSetupError> {
        let log_group = self.log_group.clone();
        let stream = stream_name.to_string();
        let client = self.logs_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                match client
                    .create_log_stream()
                    .log_group_name(&log_group)
                    .log_stream_name(&stream)
                    .send()
                    .await
                {
                    Ok(_) => Ok(StreamSetup::Created),
                    Err(error) => {
                        let service_error = error.into_service_error();
                        if !service_error.is_resource_already_exists_exception() {
                            return Err(StreamSetupError {
                                message: format!("failed to create log stream: {service_error}"),
                            });
                        }

                        let described = client
                            .describe_log_streams()
                            .log_group_name(&log_group)
                            .log_stream_name_prefix(&stream)
                            .limit(1)
                            .send()
                            .await
                            .map_err(|error| StreamSetupError {
                                message: format!("failed to describe log streams: {error}"),
                            })?;
                        let sequence_token = described
                            .log_streams()
                            .first()
                            .and_then(|existing| existing.upload_sequence_token())
                            .map(str::to_string);
                        Ok(StreamSetup::AlreadyExists { sequence_token })
                    }
                }
            })
        })
    }

    fn append_events(
        &self,
        stream_name: &str,
        events: &[LogLineEvent],
        sequence_token: Option<&str>,
    ) -> Result<Option<String>, AppendError> {
        let log_group = self.log_group.clone();
        let stream = stream_name.to_string();
        let token = sequence_token.map(str::to_string);
        let client = self.logs_client.clone();

        let mut log_events = Vec::with_capacity(events.len());
        for event in events {
            let log_event = InputLogEvent::builder()
                .timestamp(event.timestamp)
                .message(&event.message)
                .build()
                .map_err(|error| AppendError {
                    message: format!("failed to build log event: {error}"),
                })?;
            log_events.push(log_event);
        }

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = client
                    .put_log_events()
                    .log_group_name(&log_group)
                    .log_stream_name(&stream)
                    .set_log_events(Some(log_events))
                    .set_sequence_token(token)
                    .send()
                    .await
                    .map_err(|error| AppendError {
                        message: format!("failed to put log events: {error}"),
                    })?;
                Ok(response.next_sequence_token().map(str::to_string))
            })
        })
    }
}

async fn handle_request(
    config: &RelayConfig,
    fetcher: &S3ObjectFetcher,
    sink: &CloudWatchLogSink,
    event: LambdaEvent<S3Event>,
) -> Result<(), Error> {
    let refs = object_refs_from_event(&event.payload);
    handle_event(&refs, config, fetcher, sink)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let log_group =
        std::env::var("LOG_GROUP").map_err(|_| Error::from("LOG_GROUP must be configured"))?;

    // Clients and config are built once at startup and reused across
    // invocations.
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let fetcher = S3ObjectFetcher {
        s3_client: aws_sdk_s3::Client::new(&aws_config),
    };
    let sink = CloudWatchLogSink {
        logs_client: aws_sdk_cloudwatchlogs::Client::new(&aws_config),
        log_group: log_group.clone(),
    };
    let config = RelayConfig { log_group };

    let config_ref = &config;
    let fetcher_ref = &fetcher;
    let sink_ref = &sink;
    lambda_runtime::run(service_fn(move |event| {
        handle_request(config_ref, fetcher_ref, sink_ref, event)
    }))
    .await
}
