pub mod notify;
pub mod service_restart;
