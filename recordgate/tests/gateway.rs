//! End-to-end gateway behavior against the in-memory backend.

use std::sync::Arc;

use recordgate::{memory::MemoryStore, prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[record(collection = "pets")]
struct Pet {
    #[serde(rename = "_id")]
    id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    tag: String,
}

impl Pet {
    fn new(name: &str, tag: &str) -> Self {
        Self {
            id: RecordId::new(),
            name: Some(name.to_string()),
            tag: tag.to_string(),
        }
    }
}

fn gateway() -> RecordGateway<Pet, recordgate::memory::MemoryCollection<Pet>> {
    RecordGateway::new(MemoryStore::new().collection::<Pet>())
}

#[tokio::test]
async fn created_records_are_readable_and_searchable() {
    let gateway = gateway();
    let created = gateway.create(Pet::new("a", "x")).await.unwrap();

    let read = gateway
        .read(Filter::id(*created.id()))
        .await
        .unwrap();
    assert_eq!(read, Some(created.clone()));

    let searched = gateway
        .search(Filter::id(*created.id()))
        .await
        .unwrap();
    assert_eq!(searched, vec![created]);
}

#[tokio::test]
async fn update_sets_unsets_and_touches_nothing_else() {
    let gateway = gateway();
    let created = gateway.create(Pet::new("a", "x")).await.unwrap();

    let updated = gateway
        .update(
            Filter::id(*created.id()),
            Patch::new().set("tag", "y"),
            &["name"],
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.tag, "y");
    assert_eq!(updated.name, None);
    assert_eq!(updated.id, created.id);
}

#[tokio::test]
async fn update_is_idempotent() {
    let gateway = gateway();
    let created = gateway.create(Pet::new("a", "x")).await.unwrap();

    let once = gateway
        .update(
            Filter::id(*created.id()),
            Patch::new().set("tag", "y"),
            &["name"],
        )
        .await
        .unwrap();
    let twice = gateway
        .update(
            Filter::id(*created.id()),
            Patch::new().set("tag", "y"),
            &["name"],
        )
        .await
        .unwrap();

    assert_eq!(once, twice);
}

#[tokio::test]
async fn missing_targets_are_soft_not_found() {
    let gateway = gateway();
    let ghost = RecordId::new();

    let updated = gateway
        .update(Filter::id(ghost), Patch::new().set("tag", "y"), &[])
        .await
        .unwrap();
    assert_eq!(updated, None);

    let replaced = gateway
        .replace(ghost, Pet::new("a", "x"))
        .await
        .unwrap();
    assert_eq!(replaced, None);

    let removed = gateway.remove(ghost).await.unwrap();
    assert_eq!(removed, None);
}

#[tokio::test]
async fn replace_substitutes_contents_but_keeps_identity() {
    let gateway = gateway();
    let created = gateway.create(Pet::new("a", "x")).await.unwrap();

    let replaced = gateway
        .replace(*created.id(), Pet::new("b", "z"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(replaced.id, created.id);
    assert_eq!(replaced.name.as_deref(), Some("b"));
    assert_eq!(replaced.tag, "z");
}

#[tokio::test]
async fn search_returns_exactly_the_matching_set() {
    let gateway = gateway();

    let x1 = gateway.create(Pet::new("a", "x")).await.unwrap();
    let _y = gateway.create(Pet::new("b", "y")).await.unwrap();
    let x2 = gateway.create(Pet::new("c", "x")).await.unwrap();

    let found = gateway
        .search(Filter::eq("tag", "x"))
        .await
        .unwrap();
    assert_eq!(found, vec![x1, x2]);
}

#[tokio::test]
async fn parent_handle_serves_reads_and_searches_exclusively() {
    let store = MemoryStore::new();
    let gateway = RecordGateway::with_parent(
        store.collection_named::<Pet>("pets_special"),
        store.collection_named::<Pet>("pets"),
    );

    // A record created through the gateway lands in the primary collection
    // and must be invisible to reads, which are redirected to the parent.
    let child_only = gateway.create(Pet::new("a", "x")).await.unwrap();
    let read = gateway
        .read(Filter::id(*child_only.id()))
        .await
        .unwrap();
    assert_eq!(read, None);

    // Records in the parent collection are what read/search see.
    let parent_handle = store.collection_named::<Pet>("pets");
    let in_parent = parent_handle
        .create(Pet::new("b", "x"))
        .await
        .unwrap();

    let read = gateway
        .read(Filter::id(*in_parent.id()))
        .await
        .unwrap();
    assert_eq!(read, Some(in_parent.clone()));

    let searched = gateway
        .search(Filter::eq("tag", "x"))
        .await
        .unwrap();
    assert_eq!(searched, vec![in_parent]);
}

#[tokio::test]
async fn dyn_gateway_works_over_an_erased_handle() {
    let store = MemoryStore::new();
    let handle: DynCollectionHandle<Pet> = Arc::new(store.collection::<Pet>());
    let gateway = DynRecordGateway::new(handle);

    let created = gateway.create(Pet::new("a", "x")).await.unwrap();
    let read = gateway
        .read(Filter::id(*created.id()))
        .await
        .unwrap();
    assert_eq!(read, Some(created));
}

#[tokio::test]
async fn create_update_remove_scenario() {
    let gateway = gateway();

    // create {name:"a", tag:"x"}
    let created = gateway.create(Pet::new("a", "x")).await.unwrap();
    let id = *created.id();

    // update({_id}, {tag:"y"}, unset name) -> tag "y", no name
    let updated = gateway
        .update(Filter::id(id), Patch::new().set("tag", "y"), &["name"])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.tag, "y");
    assert_eq!(updated.name, None);

    // remove returns the last observed state
    let removed = gateway.remove(id).await.unwrap();
    assert_eq!(removed, Some(updated));

    // subsequent read is empty
    let read = gateway.read(Filter::id(id)).await.unwrap();
    assert_eq!(read, None);
}
