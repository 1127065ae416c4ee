//! Lambda handler that relays storage-delivered log files into CloudWatch Logs.
//!
//! The library holds the pure relay logic and the adapter trait seams for the
//! external collaborators (object fetch, log stream setup and append). The
//! `log_relay` binary wires those seams to the AWS SDK clients and runs the
//! Lambda runtime loop.

pub mod adapters;
pub mod errors;
pub mod event;
pub mod handler;
