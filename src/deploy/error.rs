// ABOUTME: Error types for deployment manager operations with SNAFU pattern.
// ABOUTME: Every failure names the operation and the stage (merge, adapter, persist) it hit.

use snafu::Snafu;
use std::fmt;

use crate::adapter::AdapterError;
use crate::blueprint::ValidationError;
use crate::repo::RepoError;
use crate::types::{DeploymentId, ServiceId};

/// Manager operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Get,
    GetFull,
    Delete,
    Redeploy,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::List => "list",
            Operation::Get => "get",
            Operation::GetFull => "get-full",
            Operation::Delete => "delete",
            Operation::Redeploy => "redeploy",
        };
        f.write_str(name)
    }
}

/// Which collaborator an operation was talking to when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Merge,
    Adapter,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Merge => "merge",
            Stage::Adapter => "adapter",
            Stage::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// Errors returned by [`DeploymentManager`](super::DeploymentManager) operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DeployError {
    #[snafu(display("invalid blueprint: {source}"))]
    Validation { source: ValidationError },

    #[snafu(display("deployment {id} not found"))]
    NotFound { id: DeploymentId },

    #[snafu(display("deployment {id} has no template snapshot to redeploy"))]
    NotRedeployable { id: DeploymentId },

    #[snafu(display("{operation} failed at adapter stage: {source}"))]
    Adapter {
        operation: Operation,
        source: AdapterError,
    },

    /// Some per-service calls succeeded before one failed. Their effects stay.
    #[snafu(display(
        "{operation} stopped at service {failed} after {completed} of {total} services: {source}"
    ))]
    PartialFailure {
        operation: Operation,
        failed: ServiceId,
        completed: usize,
        total: usize,
        source: AdapterError,
    },

    #[snafu(display("{operation} failed at persist stage: {source}"))]
    Persistence {
        operation: Operation,
        source: RepoError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// Malformed input, or nothing to redeploy. No side effects.
    Validation,
    /// The deployment id is not in the store.
    NotFound,
    /// An adapter call failed.
    Adapter,
    /// An adapter call failed after earlier per-service calls succeeded.
    PartialFailure,
    /// A store read or write failed.
    Persistence,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Validation { .. } | DeployError::NotRedeployable { .. } => {
                DeployErrorKind::Validation
            }
            DeployError::NotFound { .. } => DeployErrorKind::NotFound,
            DeployError::Adapter { .. } => DeployErrorKind::Adapter,
            DeployError::PartialFailure { .. } => DeployErrorKind::PartialFailure,
            DeployError::Persistence { .. } => DeployErrorKind::Persistence,
        }
    }

    /// The stage the operation was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            DeployError::Validation { .. } | DeployError::NotRedeployable { .. } => Stage::Merge,
            DeployError::Adapter { .. } | DeployError::PartialFailure { .. } => Stage::Adapter,
            DeployError::NotFound { .. } | DeployError::Persistence { .. } => Stage::Persist,
        }
    }

    /// True for both plain and partial adapter failures.
    pub fn is_adapter(&self) -> bool {
        self.stage() == Stage::Adapter
    }

    /// Map a store error, surfacing a missing record as `NotFound`.
    pub(crate) fn from_repo(operation: Operation, source: RepoError) -> Self {
        match source {
            RepoError::NotFound(id) => DeployError::NotFound { id },
            source => DeployError::Persistence { operation, source },
        }
    }

    /// Map the failure of per-service call number `completed` (zero-based) out of `total`.
    pub(crate) fn per_service(
        operation: Operation,
        failed: ServiceId,
        completed: usize,
        total: usize,
        source: AdapterError,
    ) -> Self {
        if completed == 0 {
            DeployError::Adapter { operation, source }
        } else {
            DeployError::PartialFailure {
                operation,
                failed,
                completed,
                total,
                source,
            }
        }
    }
}
