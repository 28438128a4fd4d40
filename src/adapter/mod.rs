// ABOUTME: Capability trait for the remote service adapter.
// ABOUTME: Create, inspect and delete services, and read adapter metadata.

mod http;

pub use http::{HttpAdapter, HttpClient, http_client};

use crate::blueprint::Image;
use crate::context::{DeadlineExceeded, OpContext};
use crate::types::ServiceId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// A service as reported by the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    /// Absent until the adapter has observed the service.
    #[serde(
        rename = "actualState",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub actual_state: Option<String>,
}

impl Service {
    pub fn new(id: ServiceId, actual_state: Option<String>) -> Self {
        Self {
            id,
            actual_state: actual_state.filter(|state| !state.is_empty()),
        }
    }

    /// A service the adapter does not know about.
    pub fn unobserved(id: ServiceId) -> Self {
        Self::new(id, None)
    }
}

/// Remote adapter operations.
///
/// Every call receives the caller's [`OpContext`] and must stop waiting once
/// its deadline passes.
#[async_trait]
pub trait AdapterClient: Send + Sync {
    /// Create one service per image. The result is index-aligned with `images`.
    async fn create_services(
        &self,
        ctx: &OpContext,
        images: &[Image],
    ) -> Result<Vec<Service>, AdapterError>;

    /// Fetch a service's current state. Unknown services have no `actual_state`.
    async fn get_service(&self, ctx: &OpContext, id: &ServiceId) -> Result<Service, AdapterError>;

    /// Delete a service.
    async fn delete_service(&self, ctx: &OpContext, id: &ServiceId) -> Result<(), AdapterError>;

    /// Free-form metadata describing the adapter.
    async fn fetch_metadata(&self, ctx: &OpContext) -> Result<serde_json::Value, AdapterError>;
}

#[async_trait]
impl<T: AdapterClient + ?Sized> AdapterClient for Arc<T> {
    async fn create_services(
        &self,
        ctx: &OpContext,
        images: &[Image],
    ) -> Result<Vec<Service>, AdapterError> {
        (**self).create_services(ctx, images).await
    }

    async fn get_service(&self, ctx: &OpContext, id: &ServiceId) -> Result<Service, AdapterError> {
        (**self).get_service(ctx, id).await
    }

    async fn delete_service(&self, ctx: &OpContext, id: &ServiceId) -> Result<(), AdapterError> {
        (**self).delete_service(ctx, id).await
    }

    async fn fetch_metadata(&self, ctx: &OpContext) -> Result<serde_json::Value, AdapterError> {
        (**self).fetch_metadata(ctx).await
    }
}

/// Errors from adapter calls.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("invalid adapter endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("adapter unreachable: {0}")]
    Transport(String),

    #[error("adapter returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to encode adapter request: {0}")]
    Encode(String),

    #[error("invalid adapter response: {0}")]
    Decode(String),

    #[error("adapter returned {actual} services for {expected} images")]
    CountMismatch { expected: usize, actual: usize },

    #[error("adapter call timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Deadline(#[from] DeadlineExceeded),
}
