//! Lambda handler that reacts to AppConfig deployment state changes.
//!
//! A completed deployment triggers a forced rolling redeployment of the
//! configured ECS service so running tasks pick up the new configuration;
//! every state change is announced on an SNS topic. The library holds the
//! classification and message logic behind adapter trait seams; the
//! `deploy_notifier` binary wires them to the AWS SDK clients.

pub mod adapters;
pub mod errors;
pub mod event;
pub mod handler;
