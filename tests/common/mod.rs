//! Shared person/contacts fixture for the integration tests.
//!
//! `PersonEdit` owns a `ContactEditList` of `ContactEdit` children. Every
//! persistence handler is a stub that records its invocation on an [`OpLog`]
//! collaborator, so tests can assert exactly which lifecycle handlers ran.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use dataportal::{
    str_arg, ChildDataPortal, ChildList, Collaborators, CriteriaKind, DomainObject, FieldBag,
    HandlerError, HandlerResult, Operation, OperationRole, OperationSet, PortalConfig,
    PortalRuntime,
};

/// Invocation counters, registered as a singleton collaborator so each test
/// runtime gets its own isolated set.
#[derive(Debug, Default)]
pub struct OpLog {
    pub inserts: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
    pub child_inserts: AtomicUsize,
    pub child_updates: AtomicUsize,
    pub child_deletes: AtomicUsize,
}

impl OpLog {
    pub fn total(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
            + self.updates.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
            + self.child_inserts.load(Ordering::SeqCst)
            + self.child_updates.load(Ordering::SeqCst)
            + self.child_deletes.load(Ordering::SeqCst)
    }
}

/// A fully wired runtime plus the shared invocation log.
pub fn build_runtime() -> (PortalRuntime, Arc<OpLog>) {
    build_runtime_with(PortalConfig::default())
}

/// Same wiring with an explicit configuration.
pub fn build_runtime_with(config: PortalConfig) -> (PortalRuntime, Arc<OpLog>) {
    let log = Arc::new(OpLog::default());
    let runtime = PortalRuntime::builder()
        .config(config)
        .register_singleton(log.clone())
        .register_child_portal::<ContactEditList>()
        .register_child_portal::<ContactEdit>()
        .build();
    (runtime, log)
}

// --- Person root object ---

#[derive(Debug, Default)]
pub struct PersonEdit {
    pub bag: FieldBag,
    pub contacts: ContactEditList,
}

impl PersonEdit {
    pub fn name(&self) -> &str {
        self.bag.get_str("name").unwrap_or_default()
    }

    pub fn set_name(&mut self, name: &str) {
        self.bag.set("name", name);
    }
}

impl DomainObject for PersonEdit {
    fn field_bag(&self) -> &FieldBag {
        &self.bag
    }

    fn field_bag_mut(&mut self) -> &mut FieldBag {
        &mut self.bag
    }

    fn is_dirty(&self) -> bool {
        self.bag.state().is_dirty() || self.contacts.items.is_dirty()
    }

    fn register_operations(ops: &mut OperationSet<Self>) {
        ops.on(OperationRole::Create)
            .criteria([CriteriaKind::String])
            .collaborator::<ChildDataPortal<ContactEditList>>()
            .handler(PersonCreate);
        ops.on(OperationRole::Fetch)
            .criteria([CriteriaKind::String])
            .collaborator::<ChildDataPortal<ContactEditList>>()
            .handler(PersonFetch);
        ops.on(OperationRole::Insert)
            .collaborator::<OpLog>()
            .collaborator::<ChildDataPortal<ContactEdit>>()
            .handler(PersonInsert);
        ops.on(OperationRole::Update)
            .collaborator::<OpLog>()
            .collaborator::<ChildDataPortal<ContactEdit>>()
            .handler(PersonUpdate);
        ops.on(OperationRole::Delete)
            .collaborator::<OpLog>()
            .handler_fn(|_, _, collab| {
                collab.get::<OpLog>()?.deletes.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
    }
}

struct PersonCreate;

#[async_trait]
impl Operation<PersonEdit> for PersonCreate {
    async fn invoke(
        &self,
        person: &mut PersonEdit,
        args: &[Value],
        collab: &Collaborators,
    ) -> HandlerResult<()> {
        person.bag.set("name", str_arg(args, 0)?);
        let contacts = collab.get::<ChildDataPortal<ContactEditList>>()?;
        person.contacts = contacts.create_child(()).await?;
        Ok(())
    }
}

struct PersonFetch;

#[async_trait]
impl Operation<PersonEdit> for PersonFetch {
    async fn invoke(
        &self,
        person: &mut PersonEdit,
        args: &[Value],
        collab: &Collaborators,
    ) -> HandlerResult<()> {
        let name = str_arg(args, 0)?;
        if name == "Boo" {
            return Err(HandlerError::NotFound(name.into()));
        }
        person.bag.set("name", name);
        let contacts = collab.get::<ChildDataPortal<ContactEditList>>()?;
        person.contacts = contacts.fetch_child(()).await?;
        Ok(())
    }
}

async fn save_contacts(
    person: &mut PersonEdit,
    portal: &ChildDataPortal<ContactEdit>,
) -> HandlerResult<()> {
    for mut removed in person.contacts.items.drain_removed() {
        portal.delete_child(&mut removed).await?;
    }
    for contact in person.contacts.items.iter_mut() {
        if contact.is_new() {
            portal.insert_child(contact).await?;
        } else if contact.is_dirty() {
            portal.update_child(contact).await?;
        }
    }
    person.contacts.items.mark_saved();
    Ok(())
}

struct PersonInsert;

#[async_trait]
impl Operation<PersonEdit> for PersonInsert {
    async fn invoke(
        &self,
        person: &mut PersonEdit,
        _args: &[Value],
        collab: &Collaborators,
    ) -> HandlerResult<()> {
        collab.get::<OpLog>()?.inserts.fetch_add(1, Ordering::SeqCst);
        save_contacts(person, &*collab.get::<ChildDataPortal<ContactEdit>>()?).await
    }
}

struct PersonUpdate;

#[async_trait]
impl Operation<PersonEdit> for PersonUpdate {
    async fn invoke(
        &self,
        person: &mut PersonEdit,
        _args: &[Value],
        collab: &Collaborators,
    ) -> HandlerResult<()> {
        collab.get::<OpLog>()?.updates.fetch_add(1, Ordering::SeqCst);
        save_contacts(person, &*collab.get::<ChildDataPortal<ContactEdit>>()?).await
    }
}

// --- Contact list ---

#[derive(Debug, Default)]
pub struct ContactEditList {
    pub bag: FieldBag,
    pub items: ChildList<ContactEdit>,
}

impl DomainObject for ContactEditList {
    fn field_bag(&self) -> &FieldBag {
        &self.bag
    }

    fn field_bag_mut(&mut self) -> &mut FieldBag {
        &mut self.bag
    }

    fn register_operations(ops: &mut OperationSet<Self>) {
        ops.on(OperationRole::CreateChild)
            .collaborator::<ChildDataPortal<ContactEdit>>()
            .handler(ContactListCreate);
        ops.on(OperationRole::FetchChild)
            .collaborator::<ChildDataPortal<ContactEdit>>()
            .handler(ContactListFetch);
    }
}

/// Seeds two contacts on every fresh list.
struct ContactListCreate;

#[async_trait]
impl Operation<ContactEditList> for ContactListCreate {
    async fn invoke(
        &self,
        list: &mut ContactEditList,
        _args: &[Value],
        collab: &Collaborators,
    ) -> HandlerResult<()> {
        let contacts = collab.get::<ChildDataPortal<ContactEdit>>()?;
        list.items
            .push(contacts.create_child(("mobile", "555-1234")).await?);
        list.items
            .push(contacts.create_child(("email", "someone@somewhere.foo")).await?);
        Ok(())
    }
}

struct ContactListFetch;

#[async_trait]
impl Operation<ContactEditList> for ContactListFetch {
    async fn invoke(
        &self,
        list: &mut ContactEditList,
        _args: &[Value],
        collab: &Collaborators,
    ) -> HandlerResult<()> {
        let contacts = collab.get::<ChildDataPortal<ContactEdit>>()?;
        let mut scope = list.items.load_scope();
        scope.push(contacts.fetch_child(("mobile", "555-1234")).await?);
        scope.push(
            contacts
                .fetch_child(("email", "someone@somewhere.foo"))
                .await?,
        );
        Ok(())
    }
}

// --- Contact leaf ---

#[derive(Debug, Default)]
pub struct ContactEdit {
    pub bag: FieldBag,
}

impl ContactEdit {
    pub fn kind(&self) -> &str {
        self.bag.get_str("kind").unwrap_or_default()
    }

    pub fn info(&self) -> &str {
        self.bag.get_str("info").unwrap_or_default()
    }

    pub fn set_info(&mut self, info: &str) {
        self.bag.set("info", info);
    }
}

impl DomainObject for ContactEdit {
    fn field_bag(&self) -> &FieldBag {
        &self.bag
    }

    fn field_bag_mut(&mut self) -> &mut FieldBag {
        &mut self.bag
    }

    fn register_operations(ops: &mut OperationSet<Self>) {
        ops.on(OperationRole::CreateChild)
            .criteria([CriteriaKind::String, CriteriaKind::String])
            .handler_fn(|contact, args, _collab| {
                contact.bag.set("kind", str_arg(args, 0)?);
                contact.bag.set("info", str_arg(args, 1)?);
                Ok(())
            });
        ops.on(OperationRole::FetchChild)
            .criteria([CriteriaKind::String, CriteriaKind::String])
            .handler_fn(|contact, args, _collab| {
                contact.bag.set("kind", str_arg(args, 0)?);
                contact.bag.set("info", str_arg(args, 1)?);
                Ok(())
            });
        ops.on(OperationRole::InsertChild)
            .collaborator::<OpLog>()
            .handler_fn(|_, _, collab| {
                collab
                    .get::<OpLog>()?
                    .child_inserts
                    .fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        ops.on(OperationRole::UpdateChild)
            .collaborator::<OpLog>()
            .handler_fn(|_, _, collab| {
                collab
                    .get::<OpLog>()?
                    .child_updates
                    .fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        ops.on(OperationRole::DeleteSelfChild)
            .collaborator::<OpLog>()
            .handler_fn(|_, _, collab| {
                collab
                    .get::<OpLog>()?
                    .child_deletes
                    .fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
    }
}
