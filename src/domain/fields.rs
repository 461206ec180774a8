//! Checked field storage for domain objects.

use std::collections::HashMap;

use serde_json::Value;

use super::LifecycleState;

/// Field map plus lifecycle state for one domain object.
///
/// Writes go through [`set`](Self::set), which marks the object dirty unless a
/// bypass scope is active. Fetch handlers hydrate through a bypass scope (or
/// [`load`](Self::load)) so that freshly loaded data does not read as an edit.
#[derive(Debug, Default)]
pub struct FieldBag {
    fields: HashMap<String, Value>,
    state: LifecycleState,
    bypass: u32,
}

impl FieldBag {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(Value::as_i64)
    }

    /// Checked write: marks the object dirty unless a bypass scope is active.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        if self.bypass == 0 {
            self.state.mark_dirty();
        }
        self.fields.insert(name.into(), value.into());
    }

    /// Unchecked write: never touches the dirty flag.
    pub fn load(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Open a bypass scope. Writes made through the returned guard do not mark
    /// the object dirty; the scope closes when the guard drops, on every exit
    /// path.
    pub fn bypass(&mut self) -> BypassScope<'_> {
        self.bypass += 1;
        BypassScope { bag: self }
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut LifecycleState {
        &mut self.state
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    // Portal-side bypass control, used while a fetch handler runs. The guard
    // form cannot be held across the handler await because it borrows the bag.
    pub(crate) fn begin_bypass(&mut self) {
        self.bypass += 1;
    }

    pub(crate) fn end_bypass(&mut self) {
        self.bypass = self.bypass.saturating_sub(1);
    }
}

/// RAII guard for a [`FieldBag`] bypass scope.
pub struct BypassScope<'a> {
    bag: &'a mut FieldBag,
}

impl std::ops::Deref for BypassScope<'_> {
    type Target = FieldBag;

    fn deref(&self) -> &FieldBag {
        self.bag
    }
}

impl std::ops::DerefMut for BypassScope<'_> {
    fn deref_mut(&mut self) -> &mut FieldBag {
        self.bag
    }
}

impl Drop for BypassScope<'_> {
    fn drop(&mut self) {
        self.bag.bypass = self.bag.bypass.saturating_sub(1);
    }
}
