//! The dispatch engine: operation resolution, collaborator supply, portal
//! entry points, and call metrics.

pub mod child_portal;
pub mod dashboard;
pub(crate) mod dispatcher;
pub mod operation;
pub mod registry;
pub mod root_portal;
pub mod runtime;
pub mod services;

pub use child_portal::ChildDataPortal;
pub use dashboard::Dashboard;
pub use operation::{
    i64_arg, str_arg, Criteria, CriteriaKind, Operation, OperationRole, OperationSet,
};
pub use registry::OperationRegistry;
pub use root_portal::DataPortal;
pub use runtime::{PortalConfig, PortalRuntime, PortalRuntimeBuilder};
pub use services::Collaborators;
