//! Test doubles for code that talks to a [`GenerativeBackend`](crate::GenerativeBackend).

mod backend;

pub use backend::{MockBackend, MockGenerateResult};
