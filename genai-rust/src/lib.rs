mod backend;
mod client_utils;
mod errors;
pub mod genai_test;
pub mod google;
mod opentelemetry;
mod types;
mod types_ext;

pub use backend::GenerativeBackend;
pub use errors::*;
pub use types::*;
