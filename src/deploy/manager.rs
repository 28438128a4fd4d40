// ABOUTME: Deployment lifecycle across the adapter and the store.
// ABOUTME: Create, list, inspect, delete and redeploy, each a fixed call sequence.

use snafu::{OptionExt, ResultExt};

use super::error::{AdapterSnafu, DeployError, NotRedeployableSnafu, Operation, ValidationSnafu};
use super::view::{DeploymentFull, DeploymentLite, Metadata};
use crate::adapter::{AdapterClient, AdapterError};
use crate::blueprint::{Blueprint, Template};
use crate::context::OpContext;
use crate::repo::{Deployment, DeploymentRepo, NewDeployment};
use crate::types::{DeploymentId, ServiceId};

/// Sequences merge, adapter and store calls for each deployment operation.
///
/// Holds no mutable state. Calls within one operation run one at a time in a
/// fixed order, and the caller's [`OpContext`] is passed to every one of them.
/// There is no compensation across the adapter and the store: a failure
/// aborts the operation and leaves completed side effects in place.
#[derive(Debug)]
pub struct DeploymentManager<R, A> {
    repo: R,
    adapter: A,
}

impl<R: DeploymentRepo, A: AdapterClient> DeploymentManager<R, A> {
    pub fn new(repo: R, adapter: A) -> Self {
        Self { repo, adapter }
    }

    /// Merge, create the services, then record the deployment.
    ///
    /// If the adapter fails nothing is written. If the store fails after the
    /// services were created, those services are left running without a record.
    pub async fn create_deployment(
        &self,
        ctx: &OpContext,
        blueprint: &Blueprint,
    ) -> Result<DeploymentLite, DeployError> {
        self.create(ctx, blueprint, Operation::Create).await
    }

    pub async fn list_deployments(
        &self,
        ctx: &OpContext,
    ) -> Result<Vec<DeploymentLite>, DeployError> {
        let deployments = self
            .repo
            .all(ctx)
            .await
            .map_err(|e| DeployError::from_repo(Operation::List, e))?;

        Ok(deployments.iter().map(DeploymentLite::from).collect())
    }

    pub async fn get_deployment(
        &self,
        ctx: &OpContext,
        id: DeploymentId,
    ) -> Result<DeploymentLite, DeployError> {
        let deployment = self.load(ctx, id, Operation::Get).await?;
        Ok(DeploymentLite::from(&deployment))
    }

    /// Fetch the record plus the adapter's state for every service, in stored order.
    ///
    /// A single failed lookup fails the whole call.
    pub async fn get_full_deployment(
        &self,
        ctx: &OpContext,
        id: DeploymentId,
    ) -> Result<DeploymentFull, DeployError> {
        let operation = Operation::GetFull;
        let deployment = self.load(ctx, id, operation).await?;

        let total = deployment.service_ids.len();
        let mut services = Vec::with_capacity(total);
        for (index, service_id) in deployment.service_ids.iter().enumerate() {
            let service = self
                .adapter
                .get_service(ctx, service_id)
                .await
                .map_err(|e| {
                    DeployError::per_service(operation, service_id.clone(), index, total, e)
                })?;
            services.push(service);
        }

        Ok(DeploymentFull::new(&deployment, services))
    }

    /// Delete every service in stored order, then remove the record.
    ///
    /// Stops at the first failed delete; the record is kept and services
    /// already deleted stay deleted.
    pub async fn delete_deployment(
        &self,
        ctx: &OpContext,
        id: DeploymentId,
    ) -> Result<(), DeployError> {
        let deployment = self.load(ctx, id, Operation::Delete).await?;
        self.teardown(ctx, &deployment, Operation::Delete).await
    }

    /// Delete the deployment and create it again from its template snapshot.
    ///
    /// The new deployment gets a new id. Not atomic: if the create fails
    /// after the delete succeeded, the deployment is gone.
    pub async fn redeploy(
        &self,
        ctx: &OpContext,
        id: DeploymentId,
    ) -> Result<DeploymentLite, DeployError> {
        let operation = Operation::Redeploy;
        let deployment = self.load(ctx, id, operation).await?;
        let template = deployment
            .snapshot()
            .cloned()
            .context(NotRedeployableSnafu { id })?;

        self.teardown(ctx, &deployment, operation).await?;

        let blueprint = Blueprint::from_template(template);
        let created = self
            .create(ctx, &blueprint, operation)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    deployment = %id,
                    name = %deployment.name,
                    error = %e,
                    "Redeploy removed the deployment but could not create it again"
                );
            })?;

        tracing::info!(previous = %id, deployment = %created.id, "Redeployed");
        Ok(created)
    }

    /// Agent version plus whatever the adapter reports. Adapter failure is not an error.
    pub async fn fetch_metadata(&self, ctx: &OpContext) -> Metadata {
        let adapter = match self.adapter.fetch_metadata(ctx).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "Adapter metadata unavailable");
                None
            }
        };
        Metadata::new(adapter)
    }

    async fn load(
        &self,
        ctx: &OpContext,
        id: DeploymentId,
        operation: Operation,
    ) -> Result<Deployment, DeployError> {
        self.repo
            .find_by_id(ctx, id)
            .await
            .map_err(|e| DeployError::from_repo(operation, e))
    }

    async fn create(
        &self,
        ctx: &OpContext,
        blueprint: &Blueprint,
        operation: Operation,
    ) -> Result<DeploymentLite, DeployError> {
        blueprint.validate().context(ValidationSnafu)?;
        let images = blueprint.merged_images();

        let services = self
            .adapter
            .create_services(ctx, &images)
            .await
            .context(AdapterSnafu { operation })?;
        if services.len() != images.len() {
            return Err(AdapterError::CountMismatch {
                expected: images.len(),
                actual: services.len(),
            })
            .context(AdapterSnafu { operation });
        }

        let service_ids: Vec<ServiceId> = services.into_iter().map(|s| s.id).collect();
        let snapshot = Template::new(blueprint.template.name.clone(), images);

        let deployment = match self
            .repo
            .save(ctx, NewDeployment::new(snapshot, service_ids.clone()))
            .await
        {
            Ok(deployment) => deployment,
            Err(e) => {
                tracing::warn!(
                    name = %blueprint.template.name,
                    services = ?service_ids,
                    error = %e,
                    "Services were created but the deployment could not be recorded"
                );
                return Err(DeployError::from_repo(operation, e));
            }
        };

        tracing::info!(
            deployment = %deployment.id,
            name = %deployment.name,
            services = deployment.service_ids.len(),
            "Created deployment"
        );
        Ok(DeploymentLite::from(&deployment))
    }

    async fn teardown(
        &self,
        ctx: &OpContext,
        deployment: &Deployment,
        operation: Operation,
    ) -> Result<(), DeployError> {
        let total = deployment.service_ids.len();
        for (index, service_id) in deployment.service_ids.iter().enumerate() {
            tracing::debug!(deployment = %deployment.id, service = %service_id, "Deleting service");
            self.adapter
                .delete_service(ctx, service_id)
                .await
                .map_err(|e| {
                    DeployError::per_service(operation, service_id.clone(), index, total, e)
                })?;
        }

        self.repo
            .remove(ctx, deployment.id)
            .await
            .map_err(|e| DeployError::from_repo(operation, e))?;

        tracing::info!(
            deployment = %deployment.id,
            name = %deployment.name,
            services = total,
            "Deleted deployment"
        );
        Ok(())
    }
}
