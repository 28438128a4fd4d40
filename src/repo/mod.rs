// ABOUTME: Persistence contract for deployment records.
// ABOUTME: Find, list, save and remove, with in-memory and JSON-file stores.

mod codec;
mod file;
mod memory;

pub use codec::{STORE_FORMAT_VERSION, StoreDocument};
pub use file::FileRepo;
pub use memory::MemoryRepo;

use crate::blueprint::Template;
use crate::context::{DeadlineExceeded, OpContext};
use crate::types::{DeploymentId, ServiceId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A stored deployment. Never mutated by the manager once saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub id: DeploymentId,
    pub name: String,
    /// Snapshot of the template with merged images; `None` for records that lack one.
    pub template: Option<Template>,
    /// Index-aligned with `template.images`.
    pub service_ids: Vec<ServiceId>,
    pub created_at: DateTime<Utc>,
}

impl Deployment {
    /// The template snapshot, if it has any images to deploy again.
    pub fn snapshot(&self) -> Option<&Template> {
        self.template
            .as_ref()
            .filter(|template| !template.images.is_empty())
    }

    pub fn redeployable(&self) -> bool {
        self.snapshot().is_some()
    }
}

/// A deployment about to be saved. The store assigns `id` when it is unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeployment {
    pub id: Option<DeploymentId>,
    pub name: String,
    pub template: Option<Template>,
    pub service_ids: Vec<ServiceId>,
}

impl NewDeployment {
    pub fn new(template: Template, service_ids: Vec<ServiceId>) -> Self {
        Self {
            id: None,
            name: template.name.clone(),
            template: Some(template),
            service_ids,
        }
    }

    pub(crate) fn into_stored(self, id: DeploymentId, created_at: DateTime<Utc>) -> Deployment {
        Deployment {
            id,
            name: self.name,
            template: self.template,
            service_ids: self.service_ids,
            created_at,
        }
    }
}

/// Deployment persistence.
///
/// `save` and `remove` must each be atomic from the store's point of view.
#[async_trait]
pub trait DeploymentRepo: Send + Sync {
    async fn find_by_id(
        &self,
        ctx: &OpContext,
        id: DeploymentId,
    ) -> Result<Deployment, RepoError>;

    /// All records. Order carries no meaning.
    async fn all(&self, ctx: &OpContext) -> Result<Vec<Deployment>, RepoError>;

    /// Insert (assigning an id) or, when `id` is set, replace a record.
    async fn save(
        &self,
        ctx: &OpContext,
        deployment: NewDeployment,
    ) -> Result<Deployment, RepoError>;

    async fn remove(&self, ctx: &OpContext, id: DeploymentId) -> Result<(), RepoError>;
}

#[async_trait]
impl<T: DeploymentRepo + ?Sized> DeploymentRepo for Arc<T> {
    async fn find_by_id(
        &self,
        ctx: &OpContext,
        id: DeploymentId,
    ) -> Result<Deployment, RepoError> {
        (**self).find_by_id(ctx, id).await
    }

    async fn all(&self, ctx: &OpContext) -> Result<Vec<Deployment>, RepoError> {
        (**self).all(ctx).await
    }

    async fn save(
        &self,
        ctx: &OpContext,
        deployment: NewDeployment,
    ) -> Result<Deployment, RepoError> {
        (**self).save(ctx, deployment).await
    }

    async fn remove(&self, ctx: &OpContext, id: DeploymentId) -> Result<(), RepoError> {
        (**self).remove(ctx, id).await
    }
}

/// Errors from the deployment store.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("deployment {0} not found")]
    NotFound(DeploymentId),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("no deployment ids left to allocate")]
    IdsExhausted,

    #[error("unsupported store format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error(transparent)]
    Deadline(#[from] DeadlineExceeded),
}
