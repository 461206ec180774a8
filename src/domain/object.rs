//! The trait domain objects implement to participate in portal dispatch.

use crate::core::operation::OperationSet;

use super::FieldBag;

/// A domain object managed by the data portal.
///
/// Implementors embed a [`FieldBag`] and declare their lifecycle operations in
/// [`register_operations`](Self::register_operations). The declaration runs
/// once per type, lazily on the first portal dispatch, and the resulting
/// operation set is cached for the life of the process.
pub trait DomainObject: Default + Send + 'static {
    fn field_bag(&self) -> &FieldBag;

    fn field_bag_mut(&mut self) -> &mut FieldBag;

    /// Declare the lifecycle operations this type supports.
    fn register_operations(ops: &mut OperationSet<Self>)
    where
        Self: Sized;

    fn is_new(&self) -> bool {
        self.field_bag().state().is_new()
    }

    /// Whether the object graph has unsaved changes. Types with owned
    /// children override this to fold child dirtiness into the answer; the
    /// portal's save branching consults it.
    fn is_dirty(&self) -> bool {
        self.field_bag().state().is_dirty()
    }

    fn is_deleted(&self) -> bool {
        self.field_bag().state().is_deleted()
    }

    fn is_child(&self) -> bool {
        self.field_bag().state().is_child()
    }

    /// Flag the object for deletion on its next save.
    fn mark_deleted(&mut self) {
        self.field_bag_mut().state_mut().mark_deleted();
    }
}
