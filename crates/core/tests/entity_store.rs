//! Entity store behaviour against a mock document store

mod support;

use std::sync::Arc;

use serde_json::json;
use skytrack_core::EntityStore;
use skytrack_domain::{
    AuthError, ClassPatch, Collection, NewClass, NewNote, NewTask, Role, SkyTrackError, TaskPatch,
    TaskStatus,
};
use support::{principal, signed_in_store, MockDocumentStore, Op};

#[tokio::test]
async fn add_assigns_id_and_owner_then_appends() {
    // Arrange
    let documents = MockDocumentStore::new();
    let store = signed_in_store(&documents, "u1").await;

    // Act
    let class = store.add_class(NewClass::new("Algebra", "#fff")).await.unwrap();

    // Assert
    let classes = store.classes().await;
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].id, class.id);
    assert_eq!(classes[0].owner, "u1");

    let stored = documents.document(Collection::Classes, &class.id).unwrap();
    assert_eq!(stored["owner"], json!("u1"));
    assert_eq!(stored["schemaVersion"], json!(1));
}

#[tokio::test]
async fn blank_title_never_reaches_persistence() {
    let documents = MockDocumentStore::new();
    let store = signed_in_store(&documents, "u1").await;
    let before = documents.total_calls();

    let err = store.add_task(NewTask::new("   ")).await.unwrap_err();

    assert!(matches!(err, SkyTrackError::Validation(_)));
    assert_eq!(documents.total_calls(), before);
    assert!(store.tasks().await.is_empty());
}

#[tokio::test]
async fn add_without_principal_is_unauthenticated() {
    let documents = MockDocumentStore::new();
    let store = EntityStore::new(documents.clone());

    let err = store.add_class(NewClass::new("Algebra", "#fff")).await.unwrap_err();

    assert_eq!(err.auth_kind(), Some(AuthError::Unauthenticated));
    assert_eq!(documents.total_calls(), 0);
}

#[tokio::test]
async fn update_changes_only_the_patched_field() {
    let documents = MockDocumentStore::new();
    let store = signed_in_store(&documents, "u1").await;
    let class = store.add_class(NewClass::new("Algebra", "#fff")).await.unwrap();
    let task = store.add_task(NewTask::new("Homework").with_class(&class.id)).await.unwrap();

    store.update_task(&task.id, TaskPatch::status(TaskStatus::Done)).await.unwrap();

    let updated = store.get::<skytrack_domain::TaskRecord>(&task.id).await.unwrap();
    assert_eq!(updated.status, TaskStatus::Done);
    assert_eq!(updated.title, task.title);
    assert_eq!(updated.class_id, task.class_id);
    assert_eq!(updated.description, task.description);
    assert_eq!(updated.owner, task.owner);
}

#[tokio::test]
async fn sequential_patches_compose() {
    let documents = MockDocumentStore::new();
    let store = signed_in_store(&documents, "u1").await;
    let task = store.add_task(NewTask::new("Grade quizzes")).await.unwrap();

    store.update_task(&task.id, TaskPatch::status(TaskStatus::Done)).await.unwrap();
    store.update_task(&task.id, TaskPatch::title("Renamed")).await.unwrap();

    let tasks = store.tasks().await;
    assert_eq!(tasks[0].status, TaskStatus::Done);
    assert_eq!(tasks[0].title, "Renamed");

    let stored = documents.document(Collection::Tasks, &task.id).unwrap();
    assert_eq!(stored["status"], json!("done"));
    assert_eq!(stored["title"], json!("Renamed"));
}

#[tokio::test]
async fn patch_can_clear_a_class_reference() {
    let documents = MockDocumentStore::new();
    let store = signed_in_store(&documents, "u1").await;
    let task = store.add_task(NewTask::new("Essay").with_class("c1")).await.unwrap();

    let patch = TaskPatch { class_id: Some(None), ..TaskPatch::default() };
    store.update_task(&task.id, patch).await.unwrap();

    assert_eq!(store.tasks().await[0].class_id, None);
}

#[tokio::test]
async fn blank_patch_of_required_field_is_rejected_locally() {
    let documents = MockDocumentStore::new();
    let store = signed_in_store(&documents, "u1").await;
    let class = store.add_class(NewClass::new("Algebra", "#fff")).await.unwrap();

    let patch = ClassPatch { name: Some(String::new()), ..ClassPatch::default() };
    let err = store.update_class(&class.id, patch).await.unwrap_err();

    assert!(matches!(err, SkyTrackError::Validation(_)));
    assert_eq!(documents.calls(Op::Update), 0);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let documents = MockDocumentStore::new();
    let store = signed_in_store(&documents, "u1").await;

    let update = store.update_task("missing", TaskPatch::title("x")).await.unwrap_err();
    let remove = store.remove_note("missing").await.unwrap_err();

    assert!(matches!(update, SkyTrackError::NotFound(_)));
    assert!(matches!(remove, SkyTrackError::NotFound(_)));
    assert_eq!(documents.calls(Op::Update) + documents.calls(Op::Delete), 0);
}

#[tokio::test]
async fn failed_remote_update_leaves_memory_untouched() {
    let documents = MockDocumentStore::new();
    let store = signed_in_store(&documents, "u1").await;
    let task = store.add_task(NewTask::new("Homework")).await.unwrap();
    documents.fail(Op::Update);

    let err = store.update_task(&task.id, TaskPatch::title("Changed")).await.unwrap_err();

    assert!(err.is_remote());
    assert_eq!(store.tasks().await[0].title, "Homework");
}

#[tokio::test]
async fn failed_remote_add_appends_nothing() {
    let documents = MockDocumentStore::new();
    let store = signed_in_store(&documents, "u1").await;
    documents.fail(Op::Set);

    let err = store.add_note(NewNote::new("Lecture", "")).await.unwrap_err();

    assert!(err.is_remote());
    assert!(store.notes().await.is_empty());
}

#[tokio::test]
async fn failed_remote_delete_keeps_the_record() {
    let documents = MockDocumentStore::new();
    let store = signed_in_store(&documents, "u1").await;
    let class = store.add_class(NewClass::new("Algebra", "#fff")).await.unwrap();
    documents.fail(Op::Delete);

    assert!(store.remove_class(&class.id).await.is_err());
    assert_eq!(store.classes().await.len(), 1);

    documents.recover(Op::Delete);
    store.remove_class(&class.id).await.unwrap();
    assert!(store.classes().await.is_empty());
    assert_eq!(documents.count(Collection::Classes), 0);
}

#[tokio::test]
async fn deleting_a_class_keeps_dependent_references() {
    let documents = MockDocumentStore::new();
    let store = signed_in_store(&documents, "u1").await;
    let class = store.add_class(NewClass::new("Algebra", "#fff")).await.unwrap();
    let task = store.add_task(NewTask::new("Grade quizzes").with_class(&class.id)).await.unwrap();

    store.remove_class(&class.id).await.unwrap();

    let tasks = store.tasks().await;
    assert_eq!(tasks[0].id, task.id);
    assert_eq!(tasks[0].class_id.as_deref(), Some(class.id.as_str()));
    assert!(store.resolve_class(tasks[0].class_id.as_deref()).await.is_none());
}

#[tokio::test]
async fn load_filters_by_owner_and_skips_foreign_documents() {
    let documents = MockDocumentStore::new();
    documents.seed_class("c1", "Mine", "u1");
    documents.seed_class("c2", "Theirs", "u2");
    documents.seed_task("t1", "My task", "u1");

    let store = signed_in_store(&documents, "u1").await;

    let classes = store.classes().await;
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].name, "Mine");
    assert_eq!(store.tasks().await.len(), 1);
}

#[tokio::test]
async fn version_zero_documents_are_migrated_on_load() {
    let documents = MockDocumentStore::new();
    documents.seed(
        Collection::Tasks,
        "t1",
        json!({ "title": "Old", "status": "in-progress", "classID": "", "dueDate": "", "owner": "u1" }),
    );

    let store = signed_in_store(&documents, "u1").await;

    let tasks = store.tasks().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].class_id, None);
    assert_eq!(tasks[0].due_date, None);
    assert_eq!(tasks[0].status, TaskStatus::InProgress);
}

#[tokio::test]
async fn undecodable_documents_are_skipped() {
    let documents = MockDocumentStore::new();
    documents.seed_class("c1", "Good", "u1");
    documents.seed(Collection::Classes, "c2", json!({ "owner": "u1", "name": 42 }));

    let store = signed_in_store(&documents, "u1").await;

    assert_eq!(store.classes().await.len(), 1);
}

#[tokio::test]
async fn signing_out_clears_every_collection() {
    let documents = MockDocumentStore::new();
    documents.seed_class("c1", "Algebra", "u1");
    let store = signed_in_store(&documents, "u1").await;
    assert!(!store.snapshot().await.is_empty());

    store.on_principal_changed(None).await.unwrap();

    assert!(store.snapshot().await.is_empty());
    assert!(store.principal().await.is_none());
}

#[tokio::test]
async fn same_principal_does_not_reload() {
    let documents = MockDocumentStore::new();
    let store = signed_in_store(&documents, "u1").await;
    let queries = documents.calls(Op::Query);

    let mut renamed = principal("u1", Role::Student);
    renamed.name = "Renamed".to_string();
    store.on_principal_changed(Some(renamed)).await.unwrap();

    assert_eq!(documents.calls(Op::Query), queries);
    assert_eq!(store.principal().await.unwrap().name, "Renamed");
}

#[tokio::test]
async fn stale_load_is_discarded_after_principal_switch() {
    // Arrange
    let documents = MockDocumentStore::new();
    documents.seed_class("a1", "Alice class", "alice");
    documents.seed_class("b1", "Bob class", "bob");
    let release = documents.hold_queries_for("alice");
    let store = Arc::new(EntityStore::new(documents.clone()));

    // Act - alice's load stalls while bob signs in
    let alice_load = {
        let store = store.clone();
        tokio::spawn(async move {
            store.on_principal_changed(Some(principal("alice", Role::Student))).await
        })
    };
    while documents.calls(Op::Query) == 0 {
        tokio::task::yield_now().await;
    }
    store.on_principal_changed(Some(principal("bob", Role::Student))).await.unwrap();
    release.notify_one();
    alice_load.await.unwrap().unwrap();

    // Assert
    let classes = store.classes().await;
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].owner, "bob");
    assert_eq!(store.principal().await.unwrap().uid, "bob");
}

#[tokio::test]
async fn record_added_during_initial_load_is_kept_once() {
    let documents = MockDocumentStore::new();
    documents.seed_class("c1", "Algebra", "u1");
    let release = documents.hold_queries_for("u1");
    let store = Arc::new(EntityStore::new(documents.clone()));

    let load = {
        let store = store.clone();
        tokio::spawn(async move {
            store.on_principal_changed(Some(principal("u1", Role::Student))).await
        })
    };
    while documents.calls(Op::Query) == 0 {
        tokio::task::yield_now().await;
    }
    let added = store.add_class(NewClass::new("Biology", "#0f0")).await.unwrap();
    release.notify_one();
    load.await.unwrap().unwrap();

    let mut ids: Vec<_> = store.classes().await.into_iter().map(|c| c.id).collect();
    ids.sort();
    let mut expected = vec!["c1".to_string(), added.id];
    expected.sort();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn failed_load_leaves_collections_empty() {
    let documents = MockDocumentStore::new();
    documents.seed_class("c1", "Algebra", "u1");
    documents.fail(Op::Query);
    let store = EntityStore::new(documents.clone());

    let err = store.on_principal_changed(Some(principal("u1", Role::Student))).await.unwrap_err();
    assert!(err.is_remote());
    assert!(store.snapshot().await.is_empty());

    documents.recover(Op::Query);
    store.reload().await.unwrap();
    assert_eq!(store.classes().await.len(), 1);
}

#[tokio::test]
async fn same_principal_retries_a_failed_load() {
    // Arrange
    let documents = MockDocumentStore::new();
    documents.seed_class("c1", "Algebra", "u1");
    documents.fail(Op::Query);
    let store = EntityStore::new(documents.clone());
    assert!(store.on_principal_changed(Some(principal("u1", Role::Student))).await.is_err());

    // Act
    documents.recover(Op::Query);
    store.on_principal_changed(Some(principal("u1", Role::Student))).await.unwrap();

    // Assert
    assert_eq!(store.classes().await.len(), 1);
    let queries = documents.calls(Op::Query);
    store.on_principal_changed(Some(principal("u1", Role::Student))).await.unwrap();
    assert_eq!(documents.calls(Op::Query), queries);
}

#[tokio::test]
async fn record_added_during_reload_is_kept() {
    let documents = MockDocumentStore::new();
    documents.seed_class("c1", "Algebra", "u1");
    let store = Arc::new(signed_in_store(&documents, "u1").await);
    let release = documents.hold_queries_for("u1");
    let queries = documents.calls(Op::Query);

    let reload = {
        let store = store.clone();
        tokio::spawn(async move { store.reload().await })
    };
    while documents.calls(Op::Query) == queries {
        tokio::task::yield_now().await;
    }
    let added = store.add_class(NewClass::new("Biology", "#0f0")).await.unwrap();
    release.notify_one();
    reload.await.unwrap().unwrap();

    let ids: Vec<_> = store.classes().await.into_iter().map(|c| c.id).collect();
    assert_eq!(ids, ["c1".to_string(), added.id]);
}

#[tokio::test]
async fn changes_during_reload_win_over_the_fetched_copy() {
    // Arrange
    let documents = MockDocumentStore::new();
    documents.seed_class("c1", "Algebra", "u1");
    documents.seed_class("c2", "Biology", "u1");
    let store = Arc::new(signed_in_store(&documents, "u1").await);
    let release = documents.hold_queries_for("u1");
    let queries = documents.calls(Op::Query);

    // Act - the reload has read both classes before they change
    let reload = {
        let store = store.clone();
        tokio::spawn(async move { store.reload().await })
    };
    while documents.calls(Op::Query) == queries {
        tokio::task::yield_now().await;
    }
    store.remove_class("c1").await.unwrap();
    let rename = ClassPatch { name: Some("Chemistry".to_string()), ..ClassPatch::default() };
    store.update_class("c2", rename).await.unwrap();
    release.notify_one();
    reload.await.unwrap().unwrap();

    // Assert
    let classes = store.classes().await;
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].id, "c2");
    assert_eq!(classes[0].name, "Chemistry");
}

#[tokio::test]
async fn search_uses_the_configured_limit() {
    let documents = MockDocumentStore::new();
    for i in 0..4 {
        documents.seed_class(&format!("c{i}"), &format!("Math {i}"), "u1");
    }
    let store = EntityStore::new(documents.clone()).with_search_limit(2);
    store.on_principal_changed(Some(principal("u1", Role::Student))).await.unwrap();

    let results = store.search("math").await.unwrap();
    assert_eq!(results.classes.len(), 2);
    assert!(store.search("  ").await.is_none());
}
