//! Runtime bootstrap: configuration, provider registration, and portal
//! hand-out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::child_portal::ChildDataPortal;
use crate::core::dashboard::Dashboard;
use crate::core::dispatcher::PortalShared;
use crate::core::registry::OperationRegistry;
use crate::core::root_portal::DataPortal;
use crate::core::services::ServiceRegistry;
use crate::domain::DomainObject;

/// Runtime configuration for the dispatch layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// When set, child portal operations record on the dashboard individually
    /// in addition to the enclosing root call. The default counts root
    /// round-trips only, the unit meaningful to external callers.
    #[serde(default)]
    pub count_child_operations: bool,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            count_child_operations: false,
        }
    }
}

/// The assembled dispatch layer: operation cache, collaborator providers,
/// dashboard, and configuration.
///
/// Built once at process start via [`PortalRuntime::builder`]; everything it
/// owns is shared and immutable afterwards. Cloning is cheap and every clone
/// observes the same dashboard.
#[derive(Clone)]
pub struct PortalRuntime {
    shared: Arc<PortalShared>,
}

impl PortalRuntime {
    pub fn builder() -> PortalRuntimeBuilder {
        PortalRuntimeBuilder {
            services: ServiceRegistry::default(),
            config: PortalConfig::default(),
        }
    }

    /// Portal handle for a root type.
    pub fn portal<T: DomainObject>(&self) -> DataPortal<T> {
        DataPortal::new(self.shared.clone())
    }

    pub fn dashboard(&self) -> Arc<Dashboard> {
        self.shared.dashboard.clone()
    }

    pub fn config(&self) -> &PortalConfig {
        &self.shared.config
    }
}

/// Builder for [`PortalRuntime`]. Collaborator providers are registered here
/// and frozen when [`build`](Self::build) returns.
pub struct PortalRuntimeBuilder {
    services: ServiceRegistry,
    config: PortalConfig,
}

impl PortalRuntimeBuilder {
    pub fn config(mut self, config: PortalConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a long-lived collaborator instance shared by every handler
    /// invocation that declares it. The caller keeps its own handle.
    pub fn register_singleton<C: Send + Sync + 'static>(mut self, instance: Arc<C>) -> Self {
        self.services.register_singleton_arc(instance);
        self
    }

    /// Register a collaborator produced fresh for every handler invocation
    /// that declares it. The safe default for stateful collaborators.
    pub fn register_transient<C: Send + Sync + 'static>(
        mut self,
        factory: impl Fn() -> C + Send + Sync + 'static,
    ) -> Self {
        self.services
            .register_transient_factory(move |_shared| factory());
        self
    }

    /// Make `ChildDataPortal<T>` available to handlers that declare it. The
    /// portal itself stays out of reach of application code; only the
    /// dispatch engine hands out instances.
    pub fn register_child_portal<T: DomainObject>(mut self) -> Self {
        self.services
            .register_transient_factory(|shared| ChildDataPortal::<T>::new(shared.clone()));
        self
    }

    /// Make `DataPortal<T>` available to handlers that declare it, for the
    /// rare handler that starts a nested root round-trip.
    pub fn register_portal<T: DomainObject>(mut self) -> Self {
        self.services
            .register_transient_factory(|shared| DataPortal::<T>::new(shared.clone()));
        self
    }

    pub fn build(self) -> PortalRuntime {
        let mut services = self.services;
        let dashboard = Arc::new(Dashboard::default());
        services.register_singleton_arc(dashboard.clone());
        PortalRuntime {
            shared: Arc::new(PortalShared {
                operations: OperationRegistry::new(),
                services,
                dashboard,
                config: self.config,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PortalConfig::default();
        assert!(!config.count_child_operations);
    }

    #[test]
    fn test_config_deserialize_with_defaults() {
        let config: PortalConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.count_child_operations);

        let config: PortalConfig =
            serde_json::from_str(r#"{"count_child_operations": true}"#).unwrap();
        assert!(config.count_child_operations);
    }

    #[test]
    fn test_runtime_clones_share_one_dashboard() {
        let runtime = PortalRuntime::builder().build();
        let clone = runtime.clone();
        runtime.dashboard().record_success();
        assert_eq!(clone.dashboard().completed_calls(), 1);
    }
}
