//! Game sessions: the instance entity, the session registry and the
//! coordination service that owns them.

pub mod instance;
pub mod registry;
pub mod service;

pub use instance::{GameInstance, Member};
pub use registry::GameRegistry;
pub use service::GameService;
