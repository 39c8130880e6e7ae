//! End-to-end runs of the sync engine against in-memory stores

use std::sync::Arc;

use super::*;
use crate::error::{Error, Result};
use crate::lifecycle::LifecycleNotice;
use crate::merge::MergeNotice;
use crate::model::{ContentType, Field};
use crate::selector::{ResolutionWarning, Selector};
use crate::store::{ContentStore, MemoryStore, StoreCall};

fn article() -> ContentType {
    let mut slug = Field::new("slug", "Slug", "Symbol");
    slug.extra.insert("required".to_string(), true.into());

    ContentType::new(
        "article",
        "Article",
        vec![
            Field::new("title", "Title", "Symbol"),
            slug,
            Field::array("tags", "Tags", "Symbol"),
        ],
    )
}

fn page() -> ContentType {
    ContentType::new("page", "Page", vec![Field::new("title", "Title", "Text")])
}

fn engine(stores: &[&Arc<MemoryStore>]) -> SyncEngine {
    let stores = stores
        .iter()
        .map(|store| Arc::clone(*store) as Arc<dyn ContentStore>)
        .collect();
    SyncEngine::new(stores).unwrap()
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn copy(fields: &[&str], targets: &[Selector]) -> CopyFieldsOptions {
    CopyFieldsOptions {
        source: Selector::new("blog", "article"),
        targets: targets.to_vec(),
        fields: ids(fields),
        publish: false,
        force: false,
    }
}

#[tokio::test]
async fn test_copy_fields_appends_to_every_target() {
    let blog = Arc::new(MemoryStore::new("blog", vec![article(), page()]));
    let shop = Arc::new(MemoryStore::new("shop", vec![ContentType::new("page", "Page", Vec::new())]));
    let engine = engine(&[&blog, &shop]);

    let options = copy(
        &["slug", "tags"],
        &[Selector::new("blog", "page"), Selector::new("shop", "page")],
    );
    let report = engine.copy_fields(&options, None).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.updated(), 2);

    let page = blog.content_type("page").unwrap();
    let field_ids: Vec<_> = page.fields.iter().map(|field| field.id.as_str()).collect();
    assert_eq!(field_ids, vec!["title", "slug", "tags"]);
    assert_eq!(page.field("slug").unwrap().extra["required"], true);
    assert_eq!(page.version(), Some(2));

    assert_eq!(blog.calls(), vec![StoreCall::Save("page".to_string())]);
    assert_eq!(shop.calls(), vec![StoreCall::Save("page".to_string())]);
}

#[tokio::test]
async fn test_copy_fields_publishes_when_requested() {
    let blog = Arc::new(MemoryStore::new("blog", vec![article(), page()]));
    let engine = engine(&[&blog]);

    let mut options = copy(&["slug"], &[Selector::new("blog", "page")]);
    options.publish = true;
    let report = engine.copy_fields(&options, None).await.unwrap();

    assert_eq!(report.targets[0].status, TargetStatus::Updated { published: true });
    assert_eq!(
        blog.calls(),
        vec![
            StoreCall::Save("page".to_string()),
            StoreCall::Publish("page".to_string())
        ]
    );
    assert_eq!(report.updated_snapshots()[0].version(), Some(3));
}

#[tokio::test]
async fn test_copy_fields_missing_field_writes_nothing() {
    let blog = Arc::new(MemoryStore::new("blog", vec![article(), page()]));
    let engine = engine(&[&blog]);

    let options = copy(&["slug", "body", "summary"], &[Selector::new("blog", "page")]);
    let result = engine.copy_fields(&options, None).await;

    match result {
        Err(Error::FieldNotFound { fields, source_id }) => {
            assert_eq!(fields, vec!["body", "summary"]);
            assert_eq!(source_id, "blog/article");
        }
        other => panic!("expected FieldNotFound, got {other:?}"),
    }
    assert!(blog.calls().is_empty());
}

#[tokio::test]
async fn test_copy_fields_unknown_source() {
    let blog = Arc::new(MemoryStore::new("blog", vec![page()]));
    let engine = engine(&[&blog]);

    let options = copy(&["slug"], &[Selector::new("blog", "page")]);
    let result = engine.copy_fields(&options, None).await;

    assert!(matches!(result, Err(Error::SourceNotFound(_))));
}

#[tokio::test]
async fn test_copy_fields_conflict_without_consent() {
    let blog = Arc::new(MemoryStore::new("blog", vec![article(), page()]));
    let engine = engine(&[&blog]);

    let options = copy(&["title", "slug"], &[Selector::new("blog", "page")]);
    let report = engine.copy_fields(&options, None).await.unwrap();

    let target = &report.targets[0];
    assert_eq!(target.added, vec!["slug"]);
    assert_eq!(
        target.notices,
        vec![Notice::Merge(MergeNotice::AlreadyExists {
            field_id: "title".to_string()
        })]
    );
    let stored = blog.content_type("page").unwrap();
    assert_eq!(stored.field("title").unwrap().field_type.as_str(), "Text");
}

#[tokio::test]
async fn test_copy_fields_force_refuses_incompatible_type() {
    let blog = Arc::new(MemoryStore::new("blog", vec![article(), page()]));
    let engine = engine(&[&blog]);

    let mut options = copy(&["title"], &[Selector::new("blog", "page")]);
    options.force = true;
    let report = engine.copy_fields(&options, None).await.unwrap();

    assert_eq!(report.targets[0].status, TargetStatus::Unchanged);
    assert!(matches!(
        report.targets[0].notices[0],
        Notice::Merge(MergeNotice::IncompatibleType { .. })
    ));
    assert!(blog.calls().is_empty());
}

#[tokio::test]
async fn test_copy_fields_approver_decides_every_conflict_before_writing() {
    let mut renamed = article();
    renamed.sys.id = "post".to_string();
    renamed.fields[0].name = "Headline".to_string();

    let blog = Arc::new(MemoryStore::new("blog", vec![article(), renamed]));
    let engine = engine(&[&blog]);

    let mut asked = Vec::new();
    let mut approver = |existing: &Field, _incoming: &Field| -> Result<bool> {
        asked.push(existing.id.clone());
        Ok(true)
    };

    let options = copy(&["title", "slug"], &[Selector::new("blog", "post")]);
    let report = engine.copy_fields(&options, Some(&mut approver)).await.unwrap();

    assert_eq!(asked, vec!["title"]);
    assert_eq!(report.targets[0].overwritten, vec!["title"]);
    let post = blog.content_type("post").unwrap();
    assert_eq!(post.fields[0].name, "Title");
}

#[tokio::test]
async fn test_copy_fields_abort_leaves_stores_untouched() {
    let mut renamed = article();
    renamed.sys.id = "post".to_string();
    renamed.fields[0].name = "Headline".to_string();

    let blog = Arc::new(MemoryStore::new("blog", vec![article(), page(), renamed]));
    let engine = engine(&[&blog]);

    let mut approver = |_: &Field, _: &Field| -> Result<bool> { Err(Error::Aborted) };

    let options = copy(
        &["title", "slug"],
        &[Selector::new("blog", "page"), Selector::new("blog", "post")],
    );
    let result = engine.copy_fields(&options, Some(&mut approver)).await;

    assert!(matches!(result, Err(Error::Aborted)));
    assert!(blog.calls().is_empty());
}

#[tokio::test]
async fn test_copy_fields_is_idempotent() {
    let blog = Arc::new(MemoryStore::new("blog", vec![article(), page()]));
    let engine = engine(&[&blog]);

    let options = copy(&["slug"], &[Selector::new("blog", "page")]);
    engine.copy_fields(&options, None).await.unwrap();
    let second = engine.copy_fields(&options, None).await.unwrap();

    assert_eq!(second.targets[0].status, TargetStatus::Unchanged);
    assert_eq!(blog.calls().len(), 1);
}

#[tokio::test]
async fn test_copy_fields_one_failure_does_not_stop_others() {
    let blog = Arc::new(MemoryStore::new("blog", vec![article(), page()]));
    let shop = Arc::new(
        MemoryStore::new("shop", vec![ContentType::new("page", "Page", Vec::new())]).failing_save("page"),
    );
    let engine = engine(&[&blog, &shop]);

    let options = copy(
        &["slug"],
        &[Selector::new("shop", "page"), Selector::new("blog", "page")],
    );
    let report = engine.copy_fields(&options, None).await.unwrap();

    assert!(!report.is_success());
    assert!(report.is_partial());
    assert!(report.targets[0].is_failed());
    assert_eq!(report.targets[1].status, TargetStatus::Updated { published: false });
    assert!(blog.content_type("page").unwrap().field("slug").is_some());
}

#[tokio::test]
async fn test_copy_fields_without_targets_warns() {
    let blog = Arc::new(MemoryStore::new("blog", vec![article()]));
    let engine = engine(&[&blog]);

    let options = copy(
        &["slug"],
        &[Selector::new("blog", "missing"), Selector::new("shop", "page")],
    );
    let report = engine.copy_fields(&options, None).await.unwrap();

    assert!(report.is_success());
    assert!(report.targets.is_empty());
    assert_eq!(report.warnings.len(), 3);
    assert_eq!(report.warnings[2], ResolutionWarning::NoTargets);
    assert!(blog.calls().is_empty());
}

#[tokio::test]
async fn test_copy_fields_dry_run() {
    let blog = Arc::new(MemoryStore::new("blog", vec![article(), page()]));
    let engine = engine(&[&blog]).with_dry_run(true);

    let mut options = copy(&["slug"], &[Selector::new("blog", "page")]);
    options.publish = true;
    let report = engine.copy_fields(&options, None).await.unwrap();

    assert_eq!(report.targets[0].status, TargetStatus::Planned);
    assert!(report.targets[0].content_type.field("slug").is_some());
    assert!(blog.calls().is_empty());
    assert!(blog.content_type("page").unwrap().field("slug").is_none());
}

fn omitted_article() -> ContentType {
    let mut content_type = article();
    content_type.fields[1].omitted = true;
    content_type
}

#[tokio::test]
async fn test_delete_fields_refuses_active_fields() {
    let blog = Arc::new(MemoryStore::new("blog", vec![article()]));
    let engine = engine(&[&blog]);

    let options = DeleteFieldsOptions {
        targets: vec![Selector::new("blog", "article")],
        fields: ids(&["title"]),
        force: false,
    };
    let report = engine.delete_fields(&options).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.targets[0].status, TargetStatus::Unchanged);
    assert_eq!(
        report.targets[0].notices,
        vec![Notice::Lifecycle(LifecycleNotice::NotOmitted {
            field_id: "title".to_string()
        })]
    );
    assert!(blog.calls().is_empty());
}

#[tokio::test]
async fn test_delete_fields_deletes_omitted_fields_and_publishes() {
    let blog = Arc::new(MemoryStore::new("blog", vec![omitted_article()]));
    let engine = engine(&[&blog]);

    let options = DeleteFieldsOptions {
        targets: vec![Selector::new("blog", "article")],
        fields: ids(&["slug"]),
        force: false,
    };
    let report = engine.delete_fields(&options).await.unwrap();

    assert_eq!(report.targets[0].deleted, vec!["slug"]);
    assert_eq!(report.targets[0].status, TargetStatus::Updated { published: true });
    let stored = blog.content_type("article").unwrap();
    assert!(stored.field("slug").unwrap().deleted);
    assert_eq!(
        blog.calls(),
        vec![
            StoreCall::Save("article".to_string()),
            StoreCall::Publish("article".to_string())
        ]
    );
}

#[tokio::test]
async fn test_delete_fields_force_omits_then_deletes() {
    let blog = Arc::new(MemoryStore::new("blog", vec![article()]));
    let engine = engine(&[&blog]);

    let options = DeleteFieldsOptions {
        targets: vec![Selector::new("blog", "article")],
        fields: ids(&["title", "tags"]),
        force: true,
    };
    let report = engine.delete_fields(&options).await.unwrap();

    let target = &report.targets[0];
    assert_eq!(target.omitted, vec!["title", "tags"]);
    assert_eq!(target.deleted, vec!["title", "tags"]);
    assert!(target.notices.is_empty());
    assert_eq!(
        blog.calls(),
        vec![
            StoreCall::Save("article".to_string()),
            StoreCall::Publish("article".to_string()),
            StoreCall::Save("article".to_string()),
            StoreCall::Publish("article".to_string())
        ]
    );

    let stored = blog.content_type("article").unwrap();
    assert!(stored.field("title").unwrap().deleted);
    assert!(!stored.field("slug").unwrap().omitted);
    assert!(stored.lifecycle_consistent());
}

#[tokio::test]
async fn test_delete_fields_already_deleted_is_noop() {
    let mut content_type = omitted_article();
    content_type.fields[1].deleted = true;
    let blog = Arc::new(MemoryStore::new("blog", vec![content_type]));
    let engine = engine(&[&blog]);

    let options = DeleteFieldsOptions {
        targets: vec![Selector::new("blog", "article")],
        fields: ids(&["slug"]),
        force: true,
    };
    let report = engine.delete_fields(&options).await.unwrap();

    assert_eq!(report.targets[0].status, TargetStatus::Unchanged);
    assert!(blog.calls().is_empty());
}

#[tokio::test]
async fn test_delete_fields_reports_missing_field_once() {
    let blog = Arc::new(MemoryStore::new("blog", vec![article()]));
    let engine = engine(&[&blog]);

    let options = DeleteFieldsOptions {
        targets: vec![Selector::new("blog", "article")],
        fields: ids(&["summary", "summary"]),
        force: true,
    };
    let report = engine.delete_fields(&options).await.unwrap();

    assert_eq!(
        report.targets[0].notices,
        vec![Notice::Lifecycle(LifecycleNotice::Missing {
            field_id: "summary".to_string()
        })]
    );
    assert!(blog.calls().is_empty());
}

#[tokio::test]
async fn test_delete_fields_failed_publish_marks_target_failed() {
    let blog = Arc::new(MemoryStore::new("blog", vec![article(), page()]).failing_publish("article"));
    let engine = engine(&[&blog]);

    let options = DeleteFieldsOptions {
        targets: vec![Selector::new("blog", "article"), Selector::new("blog", "page")],
        fields: ids(&["title"]),
        force: true,
    };
    let report = engine.delete_fields(&options).await.unwrap();

    assert!(report.targets[0].is_failed());
    assert!(report.targets[0].deleted.is_empty());
    assert_eq!(report.targets[1].deleted, vec!["title"]);
    assert_eq!(report.failed(), 1);
}

#[tokio::test]
async fn test_engine_rejects_duplicate_store_names() {
    let first: Arc<dyn ContentStore> = Arc::new(MemoryStore::new("blog", Vec::new()));
    let second: Arc<dyn ContentStore> = Arc::new(MemoryStore::new("blog", Vec::new()));

    let result = SyncEngine::new(vec![first, second]);

    assert!(matches!(result, Err(Error::DuplicateStore(name)) if name == "blog"));
}

#[tokio::test]
async fn test_fetch_catalog_keys_by_store() {
    let blog = Arc::new(MemoryStore::new("blog", vec![article(), page()]));
    let shop = Arc::new(MemoryStore::new("shop", Vec::new()));
    let engine = engine(&[&shop, &blog]);

    let catalog = engine.fetch_catalog().await.unwrap();

    assert_eq!(engine.store_names(), vec!["blog", "shop"]);
    assert_eq!(catalog["blog"].len(), 2);
    assert!(catalog["shop"].is_empty());
}

#[tokio::test]
async fn test_copy_fields_adds_retired_source_field_as_active() {
    let mut source = article();
    source.fields[1].omitted = true;
    source.fields[1].deleted = true;
    source.fields[2].omitted = true;

    let blog = Arc::new(MemoryStore::new("blog", vec![source, page()]));
    let engine = engine(&[&blog]);

    let options = copy(&["slug", "tags"], &[Selector::new("blog", "page")]);
    let report = engine.copy_fields(&options, None).await.unwrap();

    assert_eq!(report.targets[0].added, vec!["slug", "tags"]);
    let page = blog.content_type("page").unwrap();
    for id in ["slug", "tags"] {
        let field = page.field(id).unwrap();
        assert!(!field.omitted, "{id} should be active");
        assert!(!field.deleted, "{id} should be active");
    }
    assert_eq!(page.field("slug").unwrap().extra["required"], true);
}

#[tokio::test]
async fn test_interrupt_before_persist_issues_no_writes() {
    use std::sync::atomic::AtomicBool;

    let blog = Arc::new(MemoryStore::new("blog", vec![article(), page()]));
    let interrupted = Arc::new(AtomicBool::new(true));
    let engine = engine(&[&blog]).with_interrupt_flag(Arc::clone(&interrupted));

    let options = copy(&["slug"], &[Selector::new("blog", "page")]);
    let report = engine.copy_fields(&options, None).await.unwrap();

    assert!(!report.is_success());
    assert_eq!(
        report.targets[0].status,
        TargetStatus::Failed(Error::Aborted.to_string())
    );
    assert!(blog.calls().is_empty());
}

#[tokio::test]
async fn test_copy_fields_approver_is_consulted_for_each_target() {
    let mut post = article();
    post.sys.id = "post".to_string();
    post.fields[0].name = "Headline".to_string();
    let mut story = post.clone();
    story.sys.id = "story".to_string();

    let blog = Arc::new(MemoryStore::new("blog", vec![article(), post, story]));
    let engine = engine(&[&blog]);

    let mut answers = vec![true, false].into_iter();
    let mut approver = |_: &Field, _: &Field| -> Result<bool> { Ok(answers.next().unwrap_or(false)) };

    let options = copy(
        &["title"],
        &[Selector::new("blog", "post"), Selector::new("blog", "story")],
    );
    let report = engine.copy_fields(&options, Some(&mut approver)).await.unwrap();

    assert_eq!(report.targets[0].overwritten, vec!["title"]);
    assert!(report.targets[1].overwritten.is_empty());
    assert_eq!(blog.content_type("post").unwrap().fields[0].name, "Title");
    assert_eq!(blog.content_type("story").unwrap().fields[0].name, "Headline");
    assert_eq!(blog.calls(), vec![StoreCall::Save("post".to_string())]);
}
