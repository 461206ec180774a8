use async_trait::async_trait;
use serde_json::Value;

use dataportal::{
    str_arg, ChildDataPortal, ChildList, Collaborators, CriteriaKind, DomainObject, FieldBag,
    HandlerError, HandlerResult, Operation, OperationRole, OperationSet, PortalRuntime,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== dataportal — object lifecycle demo ===\n");

    let runtime = PortalRuntime::builder()
        .register_child_portal::<ContactEditList>()
        .register_child_portal::<ContactEdit>()
        .build();
    let portal = runtime.portal::<PersonEdit>();

    let person = portal.create("Andrea").await.expect("create failed");
    write_person(&person);

    let person = portal.fetch("Andrea").await.expect("fetch failed");
    write_person(&person);

    let mut person = portal.create("Andrea").await.expect("create failed");
    person.set_name("Ali");
    portal
        .save_and_merge(&mut person)
        .await
        .expect("save failed");
    write_person(&person);

    // This criteria is defined to fail in the fetch handler; the error
    // propagates and the dashboard records the failed call.
    if let Err(error) = portal.fetch("Boo").await {
        println!("[ERR] {error}");
    }

    let dashboard = runtime.dashboard();
    println!();
    println!("Data portal calls");
    println!(" - Completed:  {}", dashboard.completed_calls());
    println!(" - Failed:     {}", dashboard.failed_calls());
    println!(" - First call: {:?}", dashboard.first_call());
    println!(" - Last call:  {:?}", dashboard.last_call());
}

fn write_person(person: &PersonEdit) {
    println!("Name {}, IsNew {}", person.name(), person.is_new());
    println!(" Contacts {}", person.contacts.items.len());
    for contact in &person.contacts.items {
        println!(" - {} {}", contact.kind(), contact.info());
    }
}

// --- Person root object ---

#[derive(Debug, Default)]
struct PersonEdit {
    bag: FieldBag,
    contacts: ContactEditList,
}

impl PersonEdit {
    fn name(&self) -> &str {
        self.bag.get_str("name").unwrap_or_default()
    }

    fn set_name(&mut self, name: &str) {
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
            .and(OperationRole::Update)
            .collaborator::<ChildDataPortal<ContactEdit>>()
            .handler(PersonSave);
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
        let name = str_arg(args, 0)?;
        person.bag.set("name", name);
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

/// Shared insert + update: the persisted action is the same either way, and
/// the child items carry their own pending state.
struct PersonSave;

#[async_trait]
impl Operation<PersonEdit> for PersonSave {
    async fn invoke(
        &self,
        person: &mut PersonEdit,
        _args: &[Value],
        collab: &Collaborators,
    ) -> HandlerResult<()> {
        let contacts = collab.get::<ChildDataPortal<ContactEdit>>()?;
        for mut removed in person.contacts.items.drain_removed() {
            contacts.delete_child(&mut removed).await?;
        }
        for contact in person.contacts.items.iter_mut() {
            if contact.is_new() {
                contacts.insert_child(contact).await?;
            } else if contact.is_dirty() {
                contacts.update_child(contact).await?;
            }
        }
        person.contacts.items.mark_saved();
        Ok(())
    }
}

// --- Contact list ---

#[derive(Debug, Default)]
struct ContactEditList {
    bag: FieldBag,
    items: ChildList<ContactEdit>,
}

impl DomainObject for ContactEditList {
    fn field_bag(&self) -> &FieldBag {
        &self.bag
    }

    fn field_bag_mut(&mut self) -> &mut FieldBag {
        &mut self.bag
    }

    fn register_operations(ops: &mut OperationSet<Self>) {
        ops.on(OperationRole::CreateChild).handler_fn(|_, _, _| Ok(()));
        ops.on(OperationRole::FetchChild)
            .collaborator::<ChildDataPortal<ContactEdit>>()
            .handler(ContactListFetch);
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
struct ContactEdit {
    bag: FieldBag,
}

impl ContactEdit {
    fn kind(&self) -> &str {
        self.bag.get_str("kind").unwrap_or_default()
    }

    fn info(&self) -> &str {
        self.bag.get_str("info").unwrap_or_default()
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
        ops.on(OperationRole::InsertChild).handler_fn(|_, _, _| Ok(()));
        ops.on(OperationRole::UpdateChild).handler_fn(|_, _, _| Ok(()));
        ops.on(OperationRole::DeleteSelfChild).handler_fn(|_, _, _| Ok(()));
    }
}
