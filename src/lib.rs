//! # dataportal — convention-driven object lifecycle dispatch
//!
//! `dataportal` is a dispatch engine for domain (business) objects. Client
//! code asks a typed portal handle for one of a small set of named lifecycle
//! operations — create, fetch, save — and the engine resolves which
//! object-declared handler satisfies the request, supplies the collaborators
//! that handler declared, invokes it, and returns a fully populated or fully
//! persisted object graph.
//!
//! - **Operation resolution**: handlers are declared per type with a role
//!   (create / fetch / insert / update / delete, plus child variants) and a
//!   criteria shape; the registry picks the single matching handler for a
//!   request or fails fast on ambiguity.
//! - **Lifecycle bookkeeping**: every object carries new / dirty / deleted /
//!   child flags. Save branches on them — insert for new objects, update for
//!   dirty ones, delete for flagged ones, and a guaranteed no-op when nothing
//!   changed.
//! - **Checked field access**: field writes mark the object dirty unless a
//!   hydration bypass scope is open; child collections accumulate fetched
//!   items under a load scope without reading as edits.
//! - **Parent → child cascade**: a parent's handler drives child portals to
//!   populate or persist owned sub-graphs as part of one logical operation.
//! - **Call metrics**: a shared dashboard counts completed and failed portal
//!   calls with first/last timestamps, safe under concurrent callers.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dataportal::{
//!     CriteriaKind, DomainObject, FieldBag, OperationRole, OperationSet, PortalRuntime,
//! };
//!
//! #[derive(Debug, Default)]
//! struct Project {
//!     bag: FieldBag,
//! }
//!
//! impl DomainObject for Project {
//!     fn field_bag(&self) -> &FieldBag {
//!         &self.bag
//!     }
//!
//!     fn field_bag_mut(&mut self) -> &mut FieldBag {
//!         &mut self.bag
//!     }
//!
//!     fn register_operations(ops: &mut OperationSet<Self>) {
//!         ops.on(OperationRole::Create)
//!             .criteria([CriteriaKind::String])
//!             .handler_fn(|project, args, _collab| {
//!                 project.bag.set("title", args[0].clone());
//!                 Ok(())
//!             });
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let runtime = PortalRuntime::builder().build();
//!     let portal = runtime.portal::<Project>();
//!     let project = portal.create("Rewrite the billing engine").await.unwrap();
//!     assert!(project.is_new());
//!     assert!(project.is_dirty());
//! }
//! ```

pub mod core;
pub mod domain;
pub mod error;

pub use crate::core::{
    i64_arg, str_arg, ChildDataPortal, Collaborators, Criteria, CriteriaKind, Dashboard,
    DataPortal, Operation, OperationRole, OperationSet, PortalConfig, PortalRuntime,
    PortalRuntimeBuilder,
};
pub use crate::domain::{BypassScope, ChildList, DomainObject, FieldBag, LifecycleState, LoadScope};
pub use crate::error::{HandlerError, HandlerResult, PortalError, PortalResult};
