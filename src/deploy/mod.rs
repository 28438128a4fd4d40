// ABOUTME: Deployment orchestration over the adapter and the store.
// ABOUTME: Exports the manager, its view models and its error types.

mod error;
mod manager;
mod view;

pub use error::{DeployError, DeployErrorKind, Operation, Stage};
pub use manager::DeploymentManager;
pub use view::{AGENT_VERSION, AgentInfo, DeploymentFull, DeploymentLite, Metadata, Status};
