// ABOUTME: In-memory deployment store.
// ABOUTME: Used for ephemeral agents and as the store behind manager tests.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::BTreeMap;

use super::{Deployment, DeploymentRepo, NewDeployment, RepoError};
use crate::context::OpContext;
use crate::types::DeploymentId;

#[derive(Debug)]
struct MemoryState {
    next_id: DeploymentId,
    deployments: BTreeMap<DeploymentId, Deployment>,
}

/// Deployment store that lives for the lifetime of the process.
#[derive(Debug)]
pub struct MemoryRepo {
    state: Mutex<MemoryState>,
}

impl Default for MemoryRepo {
    fn default() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_id: DeploymentId::new(1),
                deployments: BTreeMap::new(),
            }),
        }
    }
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored deployments.
    pub fn len(&self) -> usize {
        self.state.lock().deployments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DeploymentRepo for MemoryRepo {
    async fn find_by_id(
        &self,
        ctx: &OpContext,
        id: DeploymentId,
    ) -> Result<Deployment, RepoError> {
        ctx.check()?;
        self.state
            .lock()
            .deployments
            .get(&id)
            .cloned()
            .ok_or(RepoError::NotFound(id))
    }

    async fn all(&self, ctx: &OpContext) -> Result<Vec<Deployment>, RepoError> {
        ctx.check()?;
        Ok(self.state.lock().deployments.values().cloned().collect())
    }

    async fn save(
        &self,
        ctx: &OpContext,
        deployment: NewDeployment,
    ) -> Result<Deployment, RepoError> {
        ctx.check()?;
        let mut state = self.state.lock();

        let id = match deployment.id {
            Some(id) => id,
            None => state.next_id,
        };
        if id >= state.next_id {
            state.next_id = id.next().ok_or(RepoError::IdsExhausted)?;
        }

        let created_at = state
            .deployments
            .get(&id)
            .map(|existing| existing.created_at)
            .unwrap_or_else(Utc::now);
        let stored = deployment.into_stored(id, created_at);
        state.deployments.insert(id, stored.clone());

        Ok(stored)
    }

    async fn remove(&self, ctx: &OpContext, id: DeploymentId) -> Result<(), RepoError> {
        ctx.check()?;
        self.state
            .lock()
            .deployments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound(id))
    }
}
