// ABOUTME: HTTP routes mapping URLs onto deployment manager operations.
// ABOUTME: Each request gets its own OpContext built from the configured timeout.

mod error;

pub use error::{ApiError, ErrorBody};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::adapter::AdapterClient;
use crate::blueprint::Blueprint;
use crate::context::OpContext;
use crate::deploy::{DeploymentFull, DeploymentLite, DeploymentManager, Metadata};
use crate::repo::DeploymentRepo;
use crate::types::DeploymentId;

/// Manager over type-erased collaborators, as served over HTTP.
pub type SharedManager = DeploymentManager<Arc<dyn DeploymentRepo>, Arc<dyn AdapterClient>>;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct ApiState {
    manager: Arc<SharedManager>,
    request_timeout: Option<Duration>,
}

impl ApiState {
    pub fn new(manager: SharedManager) -> Self {
        Self {
            manager: Arc::new(manager),
            request_timeout: None,
        }
    }

    /// Bound every request's adapter and store calls by `timeout`.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn context(&self) -> OpContext {
        match self.request_timeout {
            Some(timeout) => OpContext::with_timeout(timeout),
            None => OpContext::background(),
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/deployments",
            get(list_deployments).post(create_deployment),
        )
        .route(
            "/deployments/{id}",
            get(get_deployment).delete(delete_deployment),
        )
        .route("/deployments/{id}/redeploy", post(redeploy))
        .route("/metadata", get(metadata))
        .with_state(state)
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: ApiState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn list_deployments(State(state): State<ApiState>) -> ApiResult<Json<Vec<DeploymentLite>>> {
    let deployments = state.manager.list_deployments(&state.context()).await?;
    Ok(Json(deployments))
}

async fn create_deployment(
    State(state): State<ApiState>,
    Json(blueprint): Json<Blueprint>,
) -> ApiResult<(StatusCode, Json<DeploymentLite>)> {
    let created = state
        .manager
        .create_deployment(&state.context(), &blueprint)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_deployment(
    State(state): State<ApiState>,
    Path(id): Path<DeploymentId>,
) -> ApiResult<Json<DeploymentFull>> {
    let deployment = state
        .manager
        .get_full_deployment(&state.context(), id)
        .await?;
    Ok(Json(deployment))
}

async fn delete_deployment(
    State(state): State<ApiState>,
    Path(id): Path<DeploymentId>,
) -> ApiResult<StatusCode> {
    state
        .manager
        .delete_deployment(&state.context(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn redeploy(
    State(state): State<ApiState>,
    Path(id): Path<DeploymentId>,
) -> ApiResult<(StatusCode, Json<DeploymentLite>)> {
    let created = state.manager.redeploy(&state.context(), id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn metadata(State(state): State<ApiState>) -> Json<Metadata> {
    Json(state.manager.fetch_metadata(&state.context()).await)
}
