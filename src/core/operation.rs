//! Operation declarations: roles, criteria shapes, and handler registration.

use std::any::TypeId;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::services::{Collaborators, CollaboratorSpec};
use crate::domain::DomainObject;
use crate::error::{HandlerError, HandlerResult};

/// Role of a declared lifecycle operation.
///
/// Root roles and child roles are disjoint namespaces: a root portal only
/// resolves root roles, a child portal only child roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationRole {
    Create,
    Fetch,
    Insert,
    Update,
    Delete,
    CreateChild,
    FetchChild,
    InsertChild,
    UpdateChild,
    DeleteSelfChild,
}

impl OperationRole {
    pub fn is_child(&self) -> bool {
        matches!(
            self,
            OperationRole::CreateChild
                | OperationRole::FetchChild
                | OperationRole::InsertChild
                | OperationRole::UpdateChild
                | OperationRole::DeleteSelfChild
        )
    }
}

impl std::fmt::Display for OperationRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OperationRole::Create => "create",
            OperationRole::Fetch => "fetch",
            OperationRole::Insert => "insert",
            OperationRole::Update => "update",
            OperationRole::Delete => "delete",
            OperationRole::CreateChild => "create-child",
            OperationRole::FetchChild => "fetch-child",
            OperationRole::InsertChild => "insert-child",
            OperationRole::UpdateChild => "update-child",
            OperationRole::DeleteSelfChild => "delete-self-child",
        };
        f.write_str(name)
    }
}

/// Type marker for one declared criteria parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriteriaKind {
    String,
    Integer,
    Float,
    Boolean,
    Object,
    Array,
    Null,
    Any,
}

impl CriteriaKind {
    /// Whether a supplied criteria value satisfies this marker.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            CriteriaKind::String => value.is_string(),
            CriteriaKind::Integer => value.as_i64().is_some() || value.as_u64().is_some(),
            CriteriaKind::Float => value.is_f64(),
            CriteriaKind::Boolean => value.is_boolean(),
            CriteriaKind::Object => value.is_object(),
            CriteriaKind::Array => value.is_array(),
            CriteriaKind::Null => value.is_null(),
            CriteriaKind::Any => true,
        }
    }
}

/// Ordered criteria values supplied to a portal operation.
#[derive(Debug, Clone, Default)]
pub struct Criteria(Vec<Value>);

impl Criteria {
    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl From<()> for Criteria {
    fn from(_: ()) -> Self {
        Criteria(Vec::new())
    }
}

impl From<&str> for Criteria {
    fn from(value: &str) -> Self {
        Criteria(vec![Value::from(value)])
    }
}

impl From<String> for Criteria {
    fn from(value: String) -> Self {
        Criteria(vec![Value::from(value)])
    }
}

impl From<i64> for Criteria {
    fn from(value: i64) -> Self {
        Criteria(vec![Value::from(value)])
    }
}

impl From<Vec<Value>> for Criteria {
    fn from(values: Vec<Value>) -> Self {
        Criteria(values)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Criteria {
    fn from((a, b): (A, B)) -> Self {
        Criteria(vec![a.into(), b.into()])
    }
}

/// Read a string criteria argument by position.
pub fn str_arg(args: &[Value], index: usize) -> HandlerResult<&str> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or(HandlerError::BadCriteria {
            index,
            expected: "string",
        })
}

/// Read an integer criteria argument by position.
pub fn i64_arg(args: &[Value], index: usize) -> HandlerResult<i64> {
    args.get(index)
        .and_then(Value::as_i64)
        .ok_or(HandlerError::BadCriteria {
            index,
            expected: "integer",
        })
}

/// One lifecycle operation handler.
///
/// Implementations receive the target object, the supplied criteria values in
/// declaration order, and the collaborators resolved for this invocation.
#[async_trait]
pub trait Operation<T: DomainObject>: Send + Sync {
    async fn invoke(
        &self,
        target: &mut T,
        args: &[Value],
        collaborators: &Collaborators,
    ) -> HandlerResult<()>;
}

struct FnOperation<F>(F);

#[async_trait]
impl<T, F> Operation<T> for FnOperation<F>
where
    T: DomainObject,
    F: Fn(&mut T, &[Value], &Collaborators) -> HandlerResult<()> + Send + Sync,
{
    async fn invoke(
        &self,
        target: &mut T,
        args: &[Value],
        collaborators: &Collaborators,
    ) -> HandlerResult<()> {
        (self.0)(target, args, collaborators)
    }
}

/// Descriptor of one declared handler: its role set, criteria shape, declared
/// collaborators, and the callable. Immutable once registered.
pub struct OperationHandle<T: DomainObject> {
    pub(crate) roles: Vec<OperationRole>,
    pub(crate) criteria: Vec<CriteriaKind>,
    pub(crate) collaborators: Vec<CollaboratorSpec>,
    pub(crate) operation: Arc<dyn Operation<T>>,
}

impl<T: DomainObject> std::fmt::Debug for OperationHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationHandle")
            .field("roles", &self.roles)
            .field("criteria", &self.criteria)
            .field("collaborators", &self.collaborators)
            .finish_non_exhaustive()
    }
}

impl<T: DomainObject> OperationHandle<T> {
    pub(crate) fn matches(&self, role: OperationRole, args: &[Value]) -> bool {
        self.roles.contains(&role)
            && self.criteria.len() == args.len()
            && self.criteria.iter().zip(args).all(|(kind, value)| kind.accepts(value))
    }
}

/// The declared operations of one domain type.
///
/// Populated by [`DomainObject::register_operations`] and cached per type by
/// the operation registry.
pub struct OperationSet<T: DomainObject> {
    pub(crate) handles: Vec<Arc<OperationHandle<T>>>,
}

impl<T: DomainObject> OperationSet<T> {
    pub(crate) fn new() -> Self {
        Self { handles: Vec::new() }
    }

    /// Start declaring a handler for `role`. The declaration takes effect when
    /// [`handler`](OperationBuilder::handler) or
    /// [`handler_fn`](OperationBuilder::handler_fn) is called.
    pub fn on(&mut self, role: OperationRole) -> OperationBuilder<'_, T> {
        OperationBuilder {
            set: self,
            roles: vec![role],
            criteria: Vec::new(),
            collaborators: Vec::new(),
        }
    }
}

/// Builder for one handler declaration.
pub struct OperationBuilder<'s, T: DomainObject> {
    set: &'s mut OperationSet<T>,
    roles: Vec<OperationRole>,
    criteria: Vec<CriteriaKind>,
    collaborators: Vec<CollaboratorSpec>,
}

impl<T: DomainObject> OperationBuilder<'_, T> {
    /// Declare an additional role served by the same handler (e.g. a shared
    /// insert + update implementation).
    pub fn and(mut self, role: OperationRole) -> Self {
        self.roles.push(role);
        self
    }

    /// Declare the criteria shape this handler accepts.
    pub fn criteria<const N: usize>(mut self, kinds: [CriteriaKind; N]) -> Self {
        self.criteria = kinds.to_vec();
        self
    }

    /// Declare a collaborator the dispatch engine must supply before the
    /// handler runs.
    pub fn collaborator<C: Send + Sync + 'static>(mut self) -> Self {
        self.collaborators.push(CollaboratorSpec {
            id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
        });
        self
    }

    /// Register an async handler.
    pub fn handler(self, operation: impl Operation<T> + 'static) {
        self.set.handles.push(Arc::new(OperationHandle {
            roles: self.roles,
            criteria: self.criteria,
            collaborators: self.collaborators,
            operation: Arc::new(operation),
        }));
    }

    /// Register a synchronous handler from a closure.
    pub fn handler_fn(
        self,
        f: impl Fn(&mut T, &[Value], &Collaborators) -> HandlerResult<()> + Send + Sync + 'static,
    ) {
        self.handler(FnOperation(f));
    }
}
