//! Portal-level error types.

use super::HandlerError;
use crate::core::operation::OperationRole;
use thiserror::Error;

/// Errors surfaced by [`DataPortal`](crate::core::root_portal::DataPortal) and
/// [`ChildDataPortal`](crate::core::child_portal::ChildDataPortal) operations.
///
/// Resolution and collaborator errors are configuration bugs and are never
/// retried by the portal. Handler failures are domain-level and propagate to
/// the caller unchanged after the dashboard has recorded the failure.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("no {role} operation on {object} accepts {arity} criteria argument(s)")]
    NoMatchingOperation {
        role: OperationRole,
        object: &'static str,
        arity: usize,
    },
    #[error("{count} {role} operations on {object} accept {arity} criteria argument(s)")]
    AmbiguousOperation {
        role: OperationRole,
        object: &'static str,
        arity: usize,
        count: usize,
    },
    #[error("collaborator {collaborator} required by {role} on {object} is not registered")]
    CollaboratorResolutionFailed {
        collaborator: &'static str,
        role: OperationRole,
        object: &'static str,
    },
    #[error("invalid lifecycle transition on {object}: {reason}")]
    InvalidLifecycleTransition {
        object: &'static str,
        reason: String,
    },
    #[error("{role} on {object} failed: {source}")]
    Handler {
        role: OperationRole,
        object: &'static str,
        #[source]
        source: HandlerError,
    },
}
