//! Error types for the data portal.
//!
//! - [`HandlerError`] — Errors raised inside an operation handler body.
//! - [`PortalError`] — Top-level errors for operation resolution, collaborator
//!   supply, lifecycle transitions, and handler failures.

pub mod handler_error;
pub mod portal_error;

pub use handler_error::HandlerError;
pub use portal_error::PortalError;

/// Convenience alias for portal-level results.
pub type PortalResult<T> = Result<T, PortalError>;
/// Convenience alias for handler-level results.
pub type HandlerResult<T> = Result<T, HandlerError>;
