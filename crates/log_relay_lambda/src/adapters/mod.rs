pub mod log_sink;
pub mod object_fetch;
