// ABOUTME: Versioned on-disk representation of the deployment store.
// ABOUTME: The only place stored records are converted to and from domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Deployment, RepoError};
use crate::blueprint::Template;
use crate::types::{DeploymentId, ServiceId};

/// Current store document format.
pub const STORE_FORMAT_VERSION: u32 = 1;

/// The whole store as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub version: u32,
    /// Next id to hand out. Only ever grows, so removed ids are never reused.
    pub next_id: DeploymentId,
    #[serde(default)]
    pub deployments: Vec<DeploymentRecord>,
}

/// One persisted deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub id: DeploymentId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
    #[serde(default)]
    pub service_ids: Vec<ServiceId>,
    pub created_at: DateTime<Utc>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            version: STORE_FORMAT_VERSION,
            next_id: DeploymentId::new(1),
            deployments: Vec::new(),
        }
    }
}

impl StoreDocument {
    pub fn decode(bytes: &[u8]) -> Result<Self, RepoError> {
        // Check the version before committing to the record layout
        #[derive(Deserialize)]
        struct Header {
            version: u32,
        }
        let header: Header = serde_json::from_slice(bytes)?;
        if header.version != STORE_FORMAT_VERSION {
            return Err(RepoError::UnsupportedVersion {
                found: header.version,
                expected: STORE_FORMAT_VERSION,
            });
        }

        let document: Self = serde_json::from_slice(bytes)?;
        Ok(document)
    }

    pub fn encode(&self) -> Result<Vec<u8>, RepoError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn find(&self, id: DeploymentId) -> Option<&DeploymentRecord> {
        self.deployments.iter().find(|record| record.id == id)
    }
}

impl From<&Deployment> for DeploymentRecord {
    fn from(deployment: &Deployment) -> Self {
        Self {
            id: deployment.id,
            name: deployment.name.clone(),
            template: deployment.template.clone(),
            service_ids: deployment.service_ids.clone(),
            created_at: deployment.created_at,
        }
    }
}

impl From<DeploymentRecord> for Deployment {
    fn from(record: DeploymentRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            template: record.template,
            service_ids: record.service_ids,
            created_at: record.created_at,
        }
    }
}
