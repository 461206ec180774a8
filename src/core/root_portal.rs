//! Root data portal: the caller-facing entry point for domain objects.

use std::marker::PhantomData;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::dispatcher::{run_operation, PortalShared};
use crate::core::operation::{Criteria, OperationRole};
use crate::domain::DomainObject;
use crate::error::{PortalError, PortalResult};

/// Typed portal handle for root objects.
///
/// Each operation resolves the matching declared handler, supplies its
/// collaborators, invokes it, transitions lifecycle state, and records the
/// outcome on the dashboard exactly once — success or failure. Failures
/// propagate to the caller unretried.
pub struct DataPortal<T: DomainObject> {
    shared: Arc<PortalShared>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DomainObject> Clone for DataPortal<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: DomainObject> DataPortal<T> {
    pub(crate) fn new(shared: Arc<PortalShared>) -> Self {
        Self {
            shared,
            _marker: PhantomData,
        }
    }

    /// Create a new object. The create handler runs against an empty
    /// instance; the result is new and dirty. Never touches a backing store.
    pub async fn create(&self, criteria: impl Into<Criteria>) -> PortalResult<T> {
        let criteria = criteria.into();
        let call_id = self.begin("create");
        let outcome = self.create_inner(criteria.values()).await;
        self.finish("create", call_id, outcome)
    }

    async fn create_inner(&self, args: &[serde_json::Value]) -> PortalResult<T> {
        let mut object = T::default();
        run_operation(&self.shared, OperationRole::Create, &mut object, args).await?;
        object.field_bag_mut().state_mut().mark_new();
        Ok(object)
    }

    /// Fetch an existing object. The fetch handler hydrates the instance with
    /// its bypass scope held open, so field writes do not read as edits; the
    /// result is neither new nor dirty.
    pub async fn fetch(&self, criteria: impl Into<Criteria>) -> PortalResult<T> {
        let criteria = criteria.into();
        let call_id = self.begin("fetch");
        let outcome = self.fetch_inner(criteria.values()).await;
        self.finish("fetch", call_id, outcome)
    }

    async fn fetch_inner(&self, args: &[serde_json::Value]) -> PortalResult<T> {
        let mut object = T::default();
        object.field_bag_mut().begin_bypass();
        let invoked = run_operation(&self.shared, OperationRole::Fetch, &mut object, args).await;
        object.field_bag_mut().end_bypass();
        invoked?;
        object.field_bag_mut().state_mut().mark_old();
        Ok(object)
    }

    /// Save an object, branching on its lifecycle state: deleted → delete
    /// handler and a terminal result; new → insert handler; dirty → update
    /// handler; otherwise a no-op that returns the instance untouched without
    /// invoking anything.
    pub async fn save(&self, mut object: T) -> PortalResult<T> {
        let call_id = self.begin("save");
        let outcome = self.save_in_place(&mut object).await;
        self.finish("save", call_id, outcome)?;
        Ok(object)
    }

    /// Same branching as [`save`](Self::save), but the persisted field values
    /// and lifecycle state land back in the caller's own instance, preserving
    /// the identity external code may already hold references to.
    pub async fn save_and_merge(&self, object: &mut T) -> PortalResult<()> {
        let call_id = self.begin("save");
        let outcome = self.save_in_place(object).await;
        self.finish("save", call_id, outcome)
    }

    async fn save_in_place(&self, object: &mut T) -> Result<(), PortalError> {
        let object_name = std::any::type_name::<T>();
        let state = *object.field_bag().state();

        if state.is_terminal() {
            return Err(PortalError::InvalidLifecycleTransition {
                object: object_name,
                reason: "object was already deleted".into(),
            });
        }
        if state.is_child() {
            return Err(PortalError::InvalidLifecycleTransition {
                object: object_name,
                reason: "child objects are saved through their parent".into(),
            });
        }

        if state.is_deleted() {
            // A new object marked deleted has nothing in the store; skip the
            // handler and retire the instance directly.
            if !state.is_new() {
                run_operation(&self.shared, OperationRole::Delete, object, &[]).await?;
            }
            object.field_bag_mut().state_mut().mark_terminal();
        } else if state.is_new() {
            run_operation(&self.shared, OperationRole::Insert, object, &[]).await?;
            object.field_bag_mut().state_mut().mark_old();
        } else if object.is_dirty() {
            // The trait method, not the raw flag: types with owned children
            // override it to aggregate child dirtiness into the graph.
            run_operation(&self.shared, OperationRole::Update, object, &[]).await?;
            object.field_bag_mut().state_mut().mark_old();
        } else {
            tracing::debug!(object = object_name, "save on a clean instance is a no-op");
        }
        Ok(())
    }

    fn begin(&self, op: &'static str) -> Uuid {
        let call_id = Uuid::new_v4();
        tracing::debug!(
            object = std::any::type_name::<T>(),
            op,
            %call_id,
            "data portal call"
        );
        call_id
    }

    /// Record the outcome on the dashboard, log failures, and hand the result
    /// back. Recording happens on every path, error included.
    fn finish<R>(&self, op: &'static str, call_id: Uuid, outcome: PortalResult<R>) -> PortalResult<R> {
        self.shared.dashboard.record(outcome.is_ok());
        if let Err(error) = &outcome {
            tracing::warn!(
                object = std::any::type_name::<T>(),
                op,
                %call_id,
                %error,
                "data portal call failed"
            );
        }
        outcome
    }
}
