//! Per-type operation registry.

use std::any::{Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use crate::core::operation::{OperationHandle, OperationRole, OperationSet};
use crate::domain::DomainObject;
use crate::error::PortalError;

/// Caches each domain type's declared operation set and resolves handlers by
/// role and supplied argument shape.
///
/// A type's set is built lazily on its first dispatch from
/// [`DomainObject::register_operations`] and is immutable afterwards.
#[derive(Default)]
pub struct OperationRegistry {
    sets: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl OperationRegistry {
    pub(crate) fn new() -> Self {
        Self {
            sets: DashMap::new(),
        }
    }

    fn set_for<T: DomainObject>(&self) -> Arc<OperationSet<T>> {
        let entry = self.sets.entry(TypeId::of::<T>()).or_insert_with(|| {
            let mut set = OperationSet::new();
            T::register_operations(&mut set);
            Arc::new(set) as Arc<dyn Any + Send + Sync>
        });
        entry
            .value()
            .clone()
            .downcast::<OperationSet<T>>()
            .expect("operation set cached under its own TypeId")
    }

    /// Resolve the single handler matching `role` and the supplied argument
    /// shape. Zero matches or more than one are both configuration errors.
    pub(crate) fn resolve<T: DomainObject>(
        &self,
        role: OperationRole,
        args: &[Value],
    ) -> Result<Arc<OperationHandle<T>>, PortalError> {
        let set = self.set_for::<T>();
        let mut matched: Option<Arc<OperationHandle<T>>> = None;
        let mut count = 0usize;
        for handle in &set.handles {
            if handle.matches(role, args) {
                count += 1;
                matched = Some(handle.clone());
            }
        }
        let object = std::any::type_name::<T>();
        match count {
            0 => Err(PortalError::NoMatchingOperation {
                role,
                object,
                arity: args.len(),
            }),
            1 => Ok(matched.expect("one match recorded")),
            _ => Err(PortalError::AmbiguousOperation {
                role,
                object,
                arity: args.len(),
                count,
            }),
        }
    }
}
