// rua-api: Async Rust client for the rua backend process.
//
// Every backend operation is a named command posted as JSON to
// `{base}/api/{command}`; replies come wrapped in a `{code, message, data}`
// envelope that this crate strips before the caller sees it.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::BackendClient;
pub use error::Error;
pub use models::{BaseResponse, SUCCESS_CODE};
pub use transport::TransportConfig;
