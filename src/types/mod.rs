// ABOUTME: Identifier types shared by the store, the adapter and the views.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod deployment_id;
mod id;

pub use deployment_id::DeploymentId;
pub use id::{Id, ServiceId, ServiceMarker};
