pub mod runtime;

pub use runtime::{create_router, start_server};
