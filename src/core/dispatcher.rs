//! The shared dispatch path behind every portal handle.
//!
//! Both [`DataPortal`](crate::core::root_portal::DataPortal) and
//! [`ChildDataPortal`](crate::core::child_portal::ChildDataPortal) funnel
//! through [`run_operation`]: resolve the handler for (role, argument shape),
//! resolve its declared collaborators, invoke it, and normalize the failure.

use std::sync::Arc;

use serde_json::Value;

use crate::core::dashboard::Dashboard;
use crate::core::operation::OperationRole;
use crate::core::registry::OperationRegistry;
use crate::core::runtime::PortalConfig;
use crate::core::services::ServiceRegistry;
use crate::domain::DomainObject;
use crate::error::PortalError;

/// Shared state behind every portal handle: the per-type operation cache, the
/// collaborator providers, the dashboard, and the runtime configuration.
/// Frozen at bootstrap.
pub(crate) struct PortalShared {
    pub(crate) operations: OperationRegistry,
    pub(crate) services: ServiceRegistry,
    pub(crate) dashboard: Arc<Dashboard>,
    pub(crate) config: PortalConfig,
}

/// Resolve and invoke the handler for one operation.
///
/// Collaborators are resolved before the handler runs; a missing provider
/// fails fast and the handler is never invoked. Handler failures are wrapped
/// with the role and object they came from, unchanged underneath.
pub(crate) async fn run_operation<T: DomainObject>(
    shared: &Arc<PortalShared>,
    role: OperationRole,
    target: &mut T,
    args: &[Value],
) -> Result<(), PortalError> {
    let object = std::any::type_name::<T>();
    let handle = shared.operations.resolve::<T>(role, args)?;
    let collaborators =
        shared
            .services
            .resolve_all(shared, &handle.collaborators, role, object)?;
    tracing::debug!(object, op = %role, arity = args.len(), "invoking operation handler");
    handle
        .operation
        .invoke(target, args, &collaborators)
        .await
        .map_err(|source| PortalError::Handler {
            role,
            object,
            source,
        })
}
