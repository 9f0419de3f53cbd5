pub mod context;
mod errors;
mod instruction;
pub mod invoker;
mod mediator;
pub mod normalize;
mod opentelemetry;
mod params;
pub mod prompts;
pub mod schema;
pub mod store;
pub mod task;
mod types;
mod types_ext;

pub use errors::*;
pub use instruction::InstructionParam;
pub use invoker::{
    BackendConnector, CredentialSource, FixedConnector, GoogleConnector, ModelConfig, ModelVariant,
};
pub use mediator::Mediator;
pub use params::MediatorParams;
pub use schema::{Schema, SchemaViolation};
pub use store::{ActivityStore, JsonFileStore, KeyValueActivityStore, MemoryStore};
pub use task::RequestKind;
pub use types::*;
pub use types_ext::rank_alerts;
