//! Child data portal: operations on parent-owned objects and collections.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::dispatcher::{run_operation, PortalShared};
use crate::core::operation::{Criteria, OperationRole};
use crate::domain::DomainObject;
use crate::error::{PortalError, PortalResult};

/// Typed portal handle for child objects.
///
/// Only reachable as a declared collaborator inside a parent's handler
/// invocation; application code never holds one directly. Unlike the root
/// portal there is no automatic insert-vs-update branching here — the parent's
/// handler picks the operation per item from the state it holds (an added item
/// → [`insert_child`](Self::insert_child), a removed item →
/// [`delete_child`](Self::delete_child), a retained modified item →
/// [`update_child`](Self::update_child)).
///
/// Child operations are accounted for as part of the enclosing root call and
/// do not record on the dashboard, unless the runtime was configured with
/// `count_child_operations`.
pub struct ChildDataPortal<T: DomainObject> {
    shared: Arc<PortalShared>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DomainObject> ChildDataPortal<T> {
    pub(crate) fn new(shared: Arc<PortalShared>) -> Self {
        Self {
            shared,
            _marker: PhantomData,
        }
    }

    /// Create a child object. The result is a new, dirty child.
    pub async fn create_child(&self, criteria: impl Into<Criteria>) -> PortalResult<T> {
        let criteria = criteria.into();
        let outcome = self.create_child_inner(criteria.values()).await;
        self.record(outcome.is_ok());
        outcome
    }

    async fn create_child_inner(&self, args: &[serde_json::Value]) -> PortalResult<T> {
        let mut child = T::default();
        run_operation(&self.shared, OperationRole::CreateChild, &mut child, args).await?;
        let state = child.field_bag_mut().state_mut();
        state.mark_child();
        state.mark_new();
        Ok(child)
    }

    /// Fetch a child object. As with a root fetch, the handler hydrates under
    /// an open bypass scope; the result is a child that is neither new nor
    /// dirty.
    pub async fn fetch_child(&self, criteria: impl Into<Criteria>) -> PortalResult<T> {
        let criteria = criteria.into();
        let outcome = self.fetch_child_inner(criteria.values()).await;
        self.record(outcome.is_ok());
        outcome
    }

    async fn fetch_child_inner(&self, args: &[serde_json::Value]) -> PortalResult<T> {
        let mut child = T::default();
        child.field_bag_mut().begin_bypass();
        let invoked =
            run_operation(&self.shared, OperationRole::FetchChild, &mut child, args).await;
        child.field_bag_mut().end_bypass();
        invoked?;
        let state = child.field_bag_mut().state_mut();
        state.mark_child();
        state.mark_old();
        Ok(child)
    }

    /// Persist a child for the first time. Afterwards the child is neither new
    /// nor dirty.
    pub async fn insert_child(&self, child: &mut T) -> PortalResult<()> {
        let outcome = self
            .persist(child, OperationRole::InsertChild)
            .await;
        self.record(outcome.is_ok());
        outcome
    }

    /// Persist changes to an existing child. Afterwards the child is neither
    /// new nor dirty.
    pub async fn update_child(&self, child: &mut T) -> PortalResult<()> {
        let outcome = self
            .persist(child, OperationRole::UpdateChild)
            .await;
        self.record(outcome.is_ok());
        outcome
    }

    /// Remove a child from the backing store. The child is terminal
    /// afterwards.
    pub async fn delete_child(&self, child: &mut T) -> PortalResult<()> {
        let outcome = self.delete_child_inner(child).await;
        self.record(outcome.is_ok());
        outcome
    }

    async fn delete_child_inner(&self, child: &mut T) -> PortalResult<()> {
        self.ensure_child(child)?;
        run_operation(
            &self.shared,
            OperationRole::DeleteSelfChild,
            child,
            &[],
        )
        .await?;
        child.field_bag_mut().state_mut().mark_terminal();
        Ok(())
    }

    async fn persist(&self, child: &mut T, role: OperationRole) -> PortalResult<()> {
        self.ensure_child(child)?;
        run_operation(&self.shared, role, child, &[]).await?;
        child.field_bag_mut().state_mut().mark_old();
        Ok(())
    }

    fn ensure_child(&self, child: &T) -> Result<(), PortalError> {
        let state = child.field_bag().state();
        if state.is_terminal() {
            return Err(PortalError::InvalidLifecycleTransition {
                object: std::any::type_name::<T>(),
                reason: "child was already deleted".into(),
            });
        }
        if !state.is_child() {
            return Err(PortalError::InvalidLifecycleTransition {
                object: std::any::type_name::<T>(),
                reason: "object is not a child of any parent".into(),
            });
        }
        Ok(())
    }

    fn record(&self, success: bool) {
        if self.shared.config.count_child_operations {
            self.shared.dashboard.record(success);
        }
    }
}
