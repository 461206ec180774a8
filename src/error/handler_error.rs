//! Handler-level error types.

use super::PortalError;
use thiserror::Error;

/// Errors raised by an operation handler body.
///
/// These are domain-level failures ("entity not found", "validation failed")
/// and stay whatever the handler made them; the portal wraps them in
/// [`PortalError::Handler`] without interpreting or retrying.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("criteria argument {index} is missing or not a {expected}")]
    BadCriteria {
        index: usize,
        expected: &'static str,
    },
    #[error("collaborator {0} was not declared by this operation")]
    UndeclaredCollaborator(&'static str),
    /// A nested portal call made by the handler failed.
    #[error(transparent)]
    Portal(Box<PortalError>),
    #[error("{0}")]
    Failed(String),
}

impl From<PortalError> for HandlerError {
    fn from(value: PortalError) -> Self {
        HandlerError::Portal(Box::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operation::OperationRole;

    #[test]
    fn test_handler_error_display() {
        assert_eq!(
            HandlerError::NotFound("Boo".into()).to_string(),
            "not found: Boo"
        );
        assert_eq!(
            HandlerError::Validation("name is required".into()).to_string(),
            "validation failed: name is required"
        );
        assert_eq!(
            HandlerError::BadCriteria {
                index: 0,
                expected: "string",
            }
            .to_string(),
            "criteria argument 0 is missing or not a string"
        );
        assert_eq!(
            HandlerError::Failed("boom".into()).to_string(),
            "boom"
        );
    }

    #[test]
    fn test_handler_error_from_portal_error() {
        let inner = PortalError::NoMatchingOperation {
            role: OperationRole::FetchChild,
            object: "Contact",
            arity: 0,
        };
        let err: HandlerError = inner.into();
        assert!(matches!(err, HandlerError::Portal(_)));
        assert!(err.to_string().contains("fetch-child"));
    }
}
