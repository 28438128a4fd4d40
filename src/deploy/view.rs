// ABOUTME: Response view models produced by the deployment manager.
// ABOUTME: Field names here are the JSON wire contract.

use serde::{Deserialize, Serialize};

use crate::adapter::Service;
use crate::repo::Deployment;
use crate::types::{DeploymentId, ServiceId};

/// Version reported for this agent in metadata.
pub const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Deployment summary without live service state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentLite {
    pub id: DeploymentId,
    pub name: String,
    pub redeployable: bool,
    #[serde(rename = "serviceIDs")]
    pub service_ids: Vec<ServiceId>,
}

impl From<&Deployment> for DeploymentLite {
    fn from(deployment: &Deployment) -> Self {
        Self {
            id: deployment.id,
            name: deployment.name.clone(),
            redeployable: deployment.redeployable(),
            service_ids: deployment.service_ids.clone(),
        }
    }
}

/// Deployment with the adapter's current view of each service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentFull {
    pub id: DeploymentId,
    pub name: String,
    pub redeployable: bool,
    pub status: Status,
}

/// Live service states, index-aligned with the deployment's service ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub services: Vec<Service>,
}

impl DeploymentFull {
    pub fn new(deployment: &Deployment, services: Vec<Service>) -> Self {
        Self {
            id: deployment.id,
            name: deployment.name.clone(),
            redeployable: deployment.redeployable(),
            status: Status { services },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub version: String,
}

/// Agent and adapter metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub agent: AgentInfo,
    /// Opaque adapter payload; absent when the adapter could not be asked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter: Option<serde_json::Value>,
}

impl Metadata {
    pub fn new(adapter: Option<serde_json::Value>) -> Self {
        Self {
            agent: AgentInfo {
                version: AGENT_VERSION.to_string(),
            },
            adapter,
        }
    }
}
