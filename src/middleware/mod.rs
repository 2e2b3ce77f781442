pub mod request_log;

pub use request_log::{log_requests, RequestId, REQUEST_ID_HEADER};
