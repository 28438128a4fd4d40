// ABOUTME: JSON-file deployment store with atomic writes.
// ABOUTME: Keeps the document in memory and rewrites it via temp file + rename.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use super::codec::{DeploymentRecord, StoreDocument};
use super::{Deployment, DeploymentRepo, NewDeployment, RepoError};
use crate::context::OpContext;
use crate::types::DeploymentId;

/// Deployment store persisted to a single JSON document.
#[derive(Debug)]
pub struct FileRepo {
    path: PathBuf,
    document: Mutex<StoreDocument>,
}

impl FileRepo {
    /// Open the store at `path`, starting empty when the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let path = path.into();

        let document = match fs::read(&path).await {
            Ok(bytes) => {
                let document = StoreDocument::decode(&bytes)?;
                tracing::info!(
                    path = %path.display(),
                    deployments = document.deployments.len(),
                    "Loaded deployment store"
                );
                document
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "Starting empty deployment store");
                StoreDocument::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, document: &StoreDocument) -> Result<(), RepoError> {
        let temp_path = self.path.with_extension("json.tmp");

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let written = async {
            fs::write(&temp_path, document.encode()?).await?;
            fs::rename(&temp_path, &self.path).await?;
            Ok::<_, RepoError>(())
        }
        .await;

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path).await
                && cleanup.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %cleanup,
                    "Could not remove temporary store file"
                );
            }
            return Err(e);
        }

        tracing::debug!(
            path = %self.path.display(),
            deployments = document.deployments.len(),
            "Saved deployment store"
        );
        Ok(())
    }

    /// Apply `change` to a copy of the document and persist it.
    ///
    /// The in-memory document is only replaced after the write succeeds.
    /// Writes are not interrupted by the deadline once started, so disk and
    /// memory never disagree.
    async fn commit<T>(
        &self,
        ctx: &OpContext,
        change: impl FnOnce(&mut StoreDocument) -> Result<T, RepoError>,
    ) -> Result<T, RepoError> {
        let mut document = ctx.bound(self.document.lock()).await?;
        ctx.check()?;

        let mut updated = document.clone();
        let result = change(&mut updated)?;
        self.write(&updated).await?;
        *document = updated;

        Ok(result)
    }
}

#[async_trait]
impl DeploymentRepo for FileRepo {
    async fn find_by_id(
        &self,
        ctx: &OpContext,
        id: DeploymentId,
    ) -> Result<Deployment, RepoError> {
        let document = ctx.bound(self.document.lock()).await?;
        document
            .find(id)
            .cloned()
            .map(Deployment::from)
            .ok_or(RepoError::NotFound(id))
    }

    async fn all(&self, ctx: &OpContext) -> Result<Vec<Deployment>, RepoError> {
        let document = ctx.bound(self.document.lock()).await?;
        Ok(document
            .deployments
            .iter()
            .cloned()
            .map(Deployment::from)
            .collect())
    }

    async fn save(
        &self,
        ctx: &OpContext,
        deployment: NewDeployment,
    ) -> Result<Deployment, RepoError> {
        self.commit(ctx, |document| {
            let id = deployment.id.unwrap_or(document.next_id);
            if id >= document.next_id {
                document.next_id = id.next().ok_or(RepoError::IdsExhausted)?;
            }

            let existing = document.deployments.iter().position(|r| r.id == id);
            let created_at = existing
                .map(|index| document.deployments[index].created_at)
                .unwrap_or_else(Utc::now);
            let stored = deployment.into_stored(id, created_at);
            let record = DeploymentRecord::from(&stored);

            match existing {
                Some(index) => document.deployments[index] = record,
                None => document.deployments.push(record),
            }
            Ok(stored)
        })
        .await
    }

    async fn remove(&self, ctx: &OpContext, id: DeploymentId) -> Result<(), RepoError> {
        self.commit(ctx, |document| {
            let index = document
                .deployments
                .iter()
                .position(|record| record.id == id)
                .ok_or(RepoError::NotFound(id))?;
            document.deployments.remove(index);
            Ok(())
        })
        .await
    }
}
