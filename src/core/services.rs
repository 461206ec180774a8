//! Collaborator supply: the provider registry and the resolved bundle handed
//! to a handler.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::dispatcher::PortalShared;
use crate::core::operation::OperationRole;
use crate::error::{HandlerError, HandlerResult, PortalError};

/// Declared collaborator dependency of one handler.
#[derive(Debug, Clone, Copy)]
pub struct CollaboratorSpec {
    pub(crate) id: TypeId,
    pub(crate) name: &'static str,
}

type SharedAny = Arc<dyn Any + Send + Sync>;
type Factory = Box<dyn Fn(&Arc<PortalShared>) -> SharedAny + Send + Sync>;

/// How a collaborator type is produced.
pub(crate) enum Provider {
    /// One long-lived instance shared by every invocation (e.g. the dashboard).
    Singleton(SharedAny),
    /// A fresh instance per invocation. The safe default.
    Transient(Factory),
}

/// Process-wide registry mapping collaborator types to providers.
///
/// Configured once at bootstrap and frozen before the first dispatch. A
/// handler never constructs its own collaborators; everything it declared is
/// resolved here before the handler runs, and a missing provider fails fast.
#[derive(Default)]
pub struct ServiceRegistry {
    providers: HashMap<TypeId, Provider>,
}

impl ServiceRegistry {
    pub(crate) fn register_singleton_arc<C: Send + Sync + 'static>(&mut self, instance: Arc<C>) {
        self.providers
            .insert(TypeId::of::<C>(), Provider::Singleton(instance));
    }

    pub(crate) fn register_transient_factory<C: Send + Sync + 'static>(
        &mut self,
        factory: impl Fn(&Arc<PortalShared>) -> C + Send + Sync + 'static,
    ) {
        self.providers.insert(
            TypeId::of::<C>(),
            Provider::Transient(Box::new(move |shared| Arc::new(factory(shared)))),
        );
    }

    fn supply(&self, shared: &Arc<PortalShared>, spec: &CollaboratorSpec) -> Option<SharedAny> {
        match self.providers.get(&spec.id)? {
            Provider::Singleton(instance) => Some(instance.clone()),
            Provider::Transient(factory) => Some(factory(shared)),
        }
    }

    /// Resolve every declared collaborator for one handler invocation.
    pub(crate) fn resolve_all(
        &self,
        shared: &Arc<PortalShared>,
        specs: &[CollaboratorSpec],
        role: OperationRole,
        object: &'static str,
    ) -> Result<Collaborators, PortalError> {
        let mut entries = Vec::with_capacity(specs.len());
        for spec in specs {
            let instance = self.supply(shared, spec).ok_or(
                PortalError::CollaboratorResolutionFailed {
                    collaborator: spec.name,
                    role,
                    object,
                },
            )?;
            entries.push((*spec, instance));
        }
        Ok(Collaborators { entries })
    }
}

/// The collaborators resolved for one handler invocation, in declaration
/// order.
pub struct Collaborators {
    entries: Vec<(CollaboratorSpec, SharedAny)>,
}

impl Collaborators {
    /// An empty bundle, for invoking handlers outside the dispatch path.
    pub fn none() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Fetch a resolved collaborator by its declared type.
    pub fn get<C: Send + Sync + 'static>(&self) -> HandlerResult<Arc<C>> {
        let id = TypeId::of::<C>();
        self.entries
            .iter()
            .find(|(spec, _)| spec.id == id)
            .and_then(|(_, instance)| instance.clone().downcast::<C>().ok())
            .ok_or_else(|| HandlerError::UndeclaredCollaborator(std::any::type_name::<C>()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborators_get_by_type() {
        let spec = CollaboratorSpec {
            id: TypeId::of::<String>(),
            name: "String",
        };
        let bundle = Collaborators {
            entries: vec![(spec, Arc::new("hello".to_string()) as SharedAny)],
        };
        let value = bundle.get::<String>().unwrap();
        assert_eq!(*value, "hello");
    }

    #[test]
    fn test_collaborators_get_undeclared_type() {
        let bundle = Collaborators::none();
        let err = bundle.get::<String>().unwrap_err();
        assert!(matches!(err, HandlerError::UndeclaredCollaborator(_)));
    }
}
