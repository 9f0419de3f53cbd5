mod api;
mod model;

pub use model::{GoogleBackend, GoogleBackendOptions, DEFAULT_BASE_URL};
