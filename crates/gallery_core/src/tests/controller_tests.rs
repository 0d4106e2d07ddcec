use super::*;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::{HostContext, HostKind, SnippetContent},
    gallery::{TemplateCategory, TemplateEntry},
};
use tokio::sync::Notify;

use crate::{
    controller::{commands::GalleryCommand, orchestration::dispatch},
    services::{
        FixedHostEnvironment, FlagStore, Navigator, Notice, Notifier, SnippetStore,
        TemplateSource, UsageSignal,
    },
};

fn meta(id: &str, name: &str) -> SnippetMeta {
    SnippetMeta {
        id: SnippetId::from(id),
        name: name.to_string(),
        template_id: None,
        modified_at: Utc::now(),
    }
}

fn sample_gallery() -> TemplateGallery {
    TemplateGallery {
        categories: vec![TemplateCategory {
            name: "Basics".to_string(),
            items: vec![TemplateEntry {
                name: "Foo".to_string(),
                description: None,
                external_id: TemplateId::from("abc"),
            }],
        }],
    }
}

#[derive(Default)]
struct FakeStore {
    snippets: Mutex<Vec<SnippetMeta>>,
    gallery_error: Option<String>,
    failing_fetches: Mutex<usize>,
    gallery_gate: Option<Arc<Notify>>,
    delete_error: Option<String>,
    create_error: Option<String>,
    new_error: Option<String>,
    create_calls: Mutex<Vec<(String, NamingPolicy)>>,
    next_id: Mutex<u32>,
}

impl FakeStore {
    fn with_snippets(snippets: Vec<SnippetMeta>) -> Self {
        Self {
            snippets: Mutex::new(snippets),
            ..Self::default()
        }
    }

    fn insert(&self, name: &str) -> SnippetMeta {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let created = meta(&format!("created-{next_id}"), name);
        self.snippets.lock().unwrap().push(created.clone());
        created
    }
}

#[async_trait]
impl SnippetStore for FakeStore {
    fn local(&self) -> LocalGallery {
        LocalGallery::new(self.snippets.lock().unwrap().clone())
    }

    async fn template_gallery(&self) -> Result<TemplateGallery> {
        if let Some(gate) = &self.gallery_gate {
            gate.notified().await;
        }
        if let Some(err) = &self.gallery_error {
            return Err(anyhow!(err.clone()));
        }
        {
            let mut failing = self.failing_fetches.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(anyhow!("gallery offline"));
            }
        }
        Ok(sample_gallery())
    }

    async fn new_snippet(&self) -> Result<Snippet> {
        if let Some(err) = &self.new_error {
            return Err(anyhow!(err.clone()));
        }
        let created = self.insert("New Snippet");
        Ok(Snippet {
            proposed_name: created.name.clone(),
            meta: Some(created),
            template_id: None,
            content: SnippetContent::default(),
        })
    }

    async fn create(&self, snippet: Snippet, naming: NamingPolicy) -> Result<Snippet> {
        self.create_calls
            .lock()
            .unwrap()
            .push((snippet.proposed_name.clone(), naming));
        if let Some(err) = &self.create_error {
            return Err(anyhow!(err.clone()));
        }
        let created = self.insert(&snippet.proposed_name);
        Ok(Snippet {
            meta: Some(created),
            ..snippet
        })
    }

    async fn delete(&self, snippet: &SnippetMeta, confirmation: Confirmation) -> Result<()> {
        assert_eq!(confirmation, Confirmation::Required);
        if let Some(err) = &self.delete_error {
            return Err(anyhow!(err.clone()));
        }
        self.snippets
            .lock()
            .unwrap()
            .retain(|existing| existing.id != snippet.id);
        Ok(())
    }

    async fn delete_all(&self, confirmation: Confirmation) -> Result<()> {
        assert_eq!(confirmation, Confirmation::Required);
        if let Some(err) = &self.delete_error {
            return Err(anyhow!(err.clone()));
        }
        self.snippets.lock().unwrap().clear();
        Ok(())
    }
}

#[derive(Default)]
struct FakeTemplates {
    fail_with: Option<String>,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<(TemplateId, String)>>,
}

#[async_trait]
impl TemplateSource for FakeTemplates {
    async fn gallery(&self) -> Result<TemplateGallery> {
        Ok(sample_gallery())
    }

    async fn materialize(&self, external_id: &TemplateId, name: &str) -> Result<Snippet> {
        self.calls
            .lock()
            .unwrap()
            .push((external_id.clone(), name.to_string()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(err) = &self.fail_with {
            return Err(anyhow!(err.clone()));
        }
        Ok(Snippet::from_template(
            external_id.clone(),
            name,
            SnippetContent::default(),
        ))
    }
}

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl Navigator for RecordingNavigator {
    fn go_to(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[derive(Default)]
struct RecordingUsage {
    events: Mutex<Vec<(String, UsageProperties)>>,
}

impl UsageSignal for RecordingUsage {
    fn emit(&self, event: &str, properties: &UsageProperties) {
        self.events
            .lock()
            .unwrap()
            .push((event.to_string(), properties.clone()));
    }
}

#[derive(Default)]
struct MemoryFlags {
    values: Mutex<HashMap<String, bool>>,
}

impl MemoryFlags {
    fn seen() -> Self {
        let flags = Self::default();
        flags
            .values
            .lock()
            .unwrap()
            .insert(ONBOARDING_FLAG_KEY.to_string(), true);
        flags
    }
}

#[async_trait]
impl FlagStore for MemoryFlags {
    async fn get(&self, key: &str) -> Result<bool> {
        Ok(self.values.lock().unwrap().get(key).copied().unwrap_or(false))
    }

    async fn set(&self, key: &str, value: bool) -> Result<()> {
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

struct Harness {
    store: Arc<FakeStore>,
    templates: Arc<FakeTemplates>,
    navigator: Arc<RecordingNavigator>,
    notifier: Arc<RecordingNotifier>,
    usage: Arc<RecordingUsage>,
    flags: Arc<MemoryFlags>,
    controller: GalleryController,
}

impl Harness {
    fn new(store: FakeStore) -> Self {
        Self::build(
            store,
            FakeTemplates::default(),
            MemoryFlags::default(),
            FixedHostEnvironment::new(HostContext {
                kind: HostKind::Excel,
                host_name: "Excel".to_string(),
            }),
        )
    }

    fn build(
        store: FakeStore,
        templates: FakeTemplates,
        flags: MemoryFlags,
        host: FixedHostEnvironment,
    ) -> Self {
        let store = Arc::new(store);
        let templates = Arc::new(templates);
        let navigator = Arc::new(RecordingNavigator::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let usage = Arc::new(RecordingUsage::default());
        let flags = Arc::new(flags);

        let controller = GalleryController::new(
            GalleryServices {
                store: store.clone(),
                templates: templates.clone(),
                navigator: navigator.clone(),
                notifier: notifier.clone(),
                usage: usage.clone(),
                flags: flags.clone(),
                host: Arc::new(host),
            },
            GalleryOptions {
                link: Some("https://example.com/import".to_string()),
            },
        );

        Self {
            store,
            templates,
            navigator,
            notifier,
            usage,
            flags,
            controller,
        }
    }

    async fn activated(self) -> Self {
        let fetch = self.controller.activate().await.expect("context is valid");
        fetch.await.expect("fetch task");
        self
    }

    fn routes(&self) -> Vec<Route> {
        self.navigator.routes.lock().unwrap().clone()
    }

    fn notices(&self) -> Vec<Notice> {
        self.notifier.notices.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<(String, UsageProperties)> {
        self.usage.events.lock().unwrap().clone()
    }

    async fn flag_seen(&self) -> bool {
        self.flags.get(ONBOARDING_FLAG_KEY).await.expect("flag")
    }
}

#[tokio::test]
async fn activation_aborts_when_context_is_invalid() {
    let harness = Harness::build(
        FakeStore::with_snippets(vec![meta("x", "Snippet X")]),
        FakeTemplates::default(),
        MemoryFlags::default(),
        FixedHostEnvironment::invalid(),
    );

    assert!(harness.controller.activate().await.is_none());

    let view = harness.controller.view();
    assert!(view.local_gallery.is_empty());
    assert!(!view.show_onboarding);
    assert!(view.template_gallery.is_none());
    assert!(view.template_gallery_error.is_none());
    assert!(harness.events().is_empty());
}

#[tokio::test]
async fn onboarding_shows_for_existing_snippets_until_dismissed() {
    let harness = Harness::new(FakeStore::with_snippets(vec![meta("x", "Snippet X")]))
        .activated()
        .await;
    assert!(harness.controller.view().show_onboarding);
    assert!(!harness.flag_seen().await);

    harness.controller.dismiss_onboarding().await;

    assert!(!harness.controller.view().show_onboarding);
    assert!(harness.flag_seen().await);

    harness.controller.dismiss_onboarding().await;
    assert!(!harness.controller.view().show_onboarding);
    assert!(harness.flag_seen().await);
}

#[tokio::test]
async fn onboarding_hidden_for_empty_gallery_regardless_of_flag() {
    let unseen = Harness::new(FakeStore::default()).activated().await;
    assert!(!unseen.controller.view().show_onboarding);

    let seen = Harness::build(
        FakeStore::default(),
        FakeTemplates::default(),
        MemoryFlags::seen(),
        FixedHostEnvironment::new(HostContext::unknown()),
    )
    .activated()
    .await;
    assert!(!seen.controller.view().show_onboarding);
}

#[tokio::test]
async fn onboarding_hidden_once_flag_was_persisted() {
    let harness = Harness::build(
        FakeStore::with_snippets(vec![meta("x", "Snippet X")]),
        FakeTemplates::default(),
        MemoryFlags::seen(),
        FixedHostEnvironment::new(HostContext::unknown()),
    )
    .activated()
    .await;

    assert!(!harness.controller.view().show_onboarding);
}

#[tokio::test]
async fn template_gallery_success_populates_view() {
    let harness = Harness::new(FakeStore::default());
    let fetch = harness.controller.activate().await.expect("activate");

    assert_eq!(fetch.await.expect("join"), TemplateFetchOutcome::Loaded);

    let view = harness.controller.view();
    assert_eq!(view.template_gallery, Some(sample_gallery()));
    assert!(view.template_gallery_error.is_none());
}

#[tokio::test]
async fn template_gallery_failure_is_rendered_and_exclusive() {
    let harness = Harness::new(FakeStore {
        gallery_error: Some("gallery offline".to_string()),
        ..FakeStore::with_snippets(vec![meta("x", "Snippet X")])
    });
    let fetch = harness.controller.activate().await.expect("activate");

    let outcome = fetch.await.expect("join");
    assert_eq!(
        outcome,
        TemplateFetchOutcome::Failed("gallery offline".to_string())
    );

    let view = harness.controller.view();
    assert!(view.template_gallery.is_none());
    assert_eq!(
        view.template_gallery_error.as_deref(),
        Some("gallery offline")
    );
    // The local list stays usable.
    assert_eq!(view.local_gallery.len(), 1);
    assert!(harness.notices().is_empty());
}

#[tokio::test]
async fn reload_after_failed_fetch_clears_the_error() {
    let harness = Harness::new(FakeStore {
        failing_fetches: Mutex::new(1),
        ..FakeStore::default()
    });
    let fetch = harness.controller.activate().await.expect("activate");
    assert_eq!(
        fetch.await.expect("join"),
        TemplateFetchOutcome::Failed("gallery offline".to_string())
    );
    assert!(harness.controller.view().template_gallery_error.is_some());

    dispatch(&harness.controller, GalleryCommand::ReloadTemplateGallery)
        .await
        .expect("join")
        .expect("reload is handled locally");

    let view = harness.controller.view();
    assert_eq!(view.template_gallery, Some(sample_gallery()));
    assert!(view.template_gallery_error.is_none());
}

#[tokio::test]
async fn local_gallery_is_visible_before_template_fetch_settles() {
    let gate = Arc::new(Notify::new());
    let harness = Harness::new(FakeStore {
        gallery_gate: Some(gate.clone()),
        ..FakeStore::with_snippets(vec![meta("x", "Snippet X")])
    });

    let fetch = harness.controller.activate().await.expect("activate");

    let pending = harness.controller.view();
    assert!(pending.local_gallery.contains(&SnippetId::from("x")));
    assert!(pending.template_gallery.is_none());
    assert!(pending.template_gallery_error.is_none());

    gate.notify_one();
    assert_eq!(fetch.await.expect("join"), TemplateFetchOutcome::Loaded);
    assert!(harness.controller.view().template_gallery.is_some());
}

#[tokio::test]
async fn settled_fetch_wakes_subscribers() {
    let harness = Harness::new(FakeStore {
        gallery_error: Some("offline".to_string()),
        ..FakeStore::default()
    });
    let mut view_rx = harness.controller.subscribe();
    view_rx.borrow_and_update();

    let fetch = harness.controller.activate().await.expect("activate");
    fetch.await.expect("join");

    assert!(view_rx.has_changed().expect("sender alive"));
    assert_eq!(
        view_rx.borrow_and_update().template_gallery_error.as_deref(),
        Some("offline")
    );
}

#[tokio::test]
async fn delete_one_rereads_local_gallery() {
    let harness = Harness::new(FakeStore::with_snippets(vec![
        meta("x", "Snippet X"),
        meta("y", "Snippet Y"),
    ]))
    .activated()
    .await;

    let outcome = harness.controller.delete_one(&meta("x", "Snippet X")).await;

    assert_eq!(outcome, DeleteOutcome::Deleted);
    let view = harness.controller.view();
    assert!(!view.local_gallery.contains(&SnippetId::from("x")));
    assert_eq!(view.local_gallery, harness.store.local());
    assert!(harness.notices().is_empty());

    let events = harness.events();
    assert_eq!(events[0].0, "Delete snippet");
    assert_eq!(events[0].1["type"], "UI Action");
    assert_eq!(events[0].1["id"], "x");
    assert_eq!(events[0].1["name"], "Snippet X");
}

#[tokio::test]
async fn delete_one_failure_notifies_and_keeps_view() {
    let harness = Harness::new(FakeStore {
        delete_error: Some("the user declined the confirmation".to_string()),
        ..FakeStore::with_snippets(vec![meta("x", "Snippet X")])
    })
    .activated()
    .await;
    let before = harness.controller.view().local_gallery;

    let outcome = harness.controller.delete_one(&meta("x", "Snippet X")).await;

    assert_eq!(outcome, DeleteOutcome::Failed);
    assert_eq!(harness.controller.view().local_gallery, before);
    let notices = harness.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, DELETE_SNIPPET_ERROR);
    assert!(notices[0].cause.contains("declined"));
}

#[tokio::test]
async fn delete_all_clears_local_gallery() {
    let harness = Harness::new(FakeStore::with_snippets(vec![
        meta("x", "Snippet X"),
        meta("y", "Snippet Y"),
    ]))
    .activated()
    .await;

    assert_eq!(harness.controller.delete_all().await, DeleteOutcome::Deleted);
    assert!(harness.controller.view().local_gallery.is_empty());
    assert_eq!(harness.events()[0].0, "Delete all snippets");
}

#[tokio::test]
async fn delete_all_failure_uses_its_own_message() {
    let harness = Harness::new(FakeStore {
        delete_error: Some("disk full".to_string()),
        ..FakeStore::with_snippets(vec![meta("x", "Snippet X")])
    })
    .activated()
    .await;

    assert_eq!(harness.controller.delete_all().await, DeleteOutcome::Failed);
    assert_eq!(harness.controller.view().local_gallery.len(), 1);
    assert_eq!(harness.notices()[0].title, DELETE_ALL_ERROR);
}

#[tokio::test]
async fn run_navigates_without_returning_to_edit() {
    let harness = Harness::new(FakeStore::default());

    harness.controller.run(&meta("x", "Snippet X"));

    assert_eq!(
        harness.routes(),
        vec![Route::Run {
            id: SnippetId::from("x"),
            return_to_edit: false,
        }]
    );
    assert_eq!(harness.events()[0].0, "Run from new");
}

#[tokio::test]
async fn select_existing_snippet_opens_editor() {
    let harness = Harness::new(FakeStore::with_snippets(vec![meta("x", "Snippet X")]));

    let outcome = harness
        .controller
        .select(Some(&meta("x", "Snippet X")))
        .await
        .expect("select");

    assert_eq!(outcome, SelectOutcome::Opened(SnippetId::from("x")));
    assert_eq!(
        harness.routes(),
        vec![Route::Edit {
            id: SnippetId::from("x")
        }]
    );
    assert_eq!(harness.events()[0].0, "Select snippet");
    assert_eq!(harness.events()[0].1["id"], "x");
}

#[tokio::test]
async fn select_without_snippet_creates_one() {
    let harness = Harness::new(FakeStore::default()).activated().await;

    let outcome = harness.controller.select(None).await.expect("select");

    let SelectOutcome::Created(id) = outcome else {
        panic!("expected a created snippet");
    };
    assert_eq!(harness.routes(), vec![Route::Edit { id: id.clone() }]);
    assert_eq!(harness.events()[0].0, "Create new snippet");
    assert!(harness.controller.view().local_gallery.contains(&id));
}

#[tokio::test]
async fn select_with_empty_meta_creates_one() {
    let harness = Harness::new(FakeStore::default());

    let outcome = harness
        .controller
        .select(Some(&meta("", "")))
        .await
        .expect("select");

    assert!(matches!(outcome, SelectOutcome::Created(_)));
    assert_eq!(harness.events()[0].0, "Create new snippet");
}

#[tokio::test]
async fn select_create_failure_propagates_without_notice() {
    let harness = Harness::new(FakeStore {
        new_error: Some("quota exceeded".to_string()),
        ..FakeStore::default()
    });

    let err = harness
        .controller
        .select(None)
        .await
        .expect_err("create should fail");

    assert!(err.to_string().contains("quota exceeded"));
    assert!(harness.notices().is_empty());
    assert!(harness.routes().is_empty());
}

#[tokio::test]
async fn import_from_template_opens_new_snippet() {
    let harness = Harness::new(FakeStore::default()).activated().await;

    let outcome = harness
        .controller
        .import_from_template(TemplateImport {
            name: "Foo".to_string(),
            external_id: TemplateId::from("abc"),
        })
        .await;

    let ImportOutcome::Opened(id) = outcome else {
        panic!("expected import to succeed");
    };
    assert_eq!(harness.routes(), vec![Route::Edit { id: id.clone() }]);
    assert!(!harness.controller.view().loaded);
    assert!(harness.controller.view().local_gallery.contains(&id));
    assert_eq!(
        harness.store.create_calls.lock().unwrap().clone(),
        vec![("Foo".to_string(), NamingPolicy::AsIs)]
    );

    let events = harness.events();
    assert_eq!(events[0].0, "CreateFromTemplate");
    assert_eq!(events[0].1["context"], "excel");
    assert_eq!(events[0].1["templateName"], "Foo");
    assert_eq!(events[0].1["templateId"], "abc");
}

#[tokio::test]
async fn import_keeps_colliding_names_as_is() {
    let harness = Harness::new(FakeStore::with_snippets(vec![meta("x", "Foo")]));

    let outcome = harness
        .controller
        .import_from_template(TemplateImport {
            name: "Foo".to_string(),
            external_id: TemplateId::from("abc"),
        })
        .await;

    assert!(matches!(outcome, ImportOutcome::Opened(_)));
    assert_eq!(
        harness.store.create_calls.lock().unwrap().clone(),
        vec![("Foo".to_string(), NamingPolicy::AsIs)]
    );
}

#[tokio::test]
async fn import_materialize_failure_restores_loaded_and_notifies() {
    let harness = Harness::build(
        FakeStore::default(),
        FakeTemplates {
            fail_with: Some("template missing".to_string()),
            ..FakeTemplates::default()
        },
        MemoryFlags::default(),
        FixedHostEnvironment::new(HostContext::unknown()),
    );

    let outcome = harness
        .controller
        .import_from_template(TemplateImport {
            name: "Foo".to_string(),
            external_id: TemplateId::from("abc"),
        })
        .await;

    assert_eq!(outcome, ImportOutcome::Failed);
    assert!(harness.controller.view().loaded);
    assert!(harness.routes().is_empty());
    assert!(harness.store.create_calls.lock().unwrap().is_empty());

    let notices = harness.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, IMPORT_ERROR_TITLE);
    assert_eq!(
        notices[0].description.as_deref(),
        Some(IMPORT_ERROR_DESCRIPTION)
    );
    assert!(notices[0].cause.contains("template missing"));
}

#[tokio::test]
async fn import_create_failure_restores_loaded() {
    let harness = Harness::new(FakeStore {
        create_error: Some("database locked".to_string()),
        ..FakeStore::default()
    });

    let outcome = harness
        .controller
        .import_from_template(TemplateImport {
            name: "Foo".to_string(),
            external_id: TemplateId::from("abc"),
        })
        .await;

    assert_eq!(outcome, ImportOutcome::Failed);
    assert!(harness.controller.view().loaded);
    assert!(harness.routes().is_empty());
    assert!(harness.notices()[0].cause.contains("database locked"));
}

#[tokio::test]
async fn loaded_is_cleared_while_import_is_in_flight() {
    let gate = Arc::new(Notify::new());
    let harness = Harness::build(
        FakeStore::default(),
        FakeTemplates {
            gate: Some(gate.clone()),
            ..FakeTemplates::default()
        },
        MemoryFlags::default(),
        FixedHostEnvironment::new(HostContext::unknown()),
    );
    assert!(harness.controller.view().loaded);

    let controller = harness.controller.clone();
    let import = tokio::spawn(async move {
        controller
            .import_from_template(TemplateImport {
                name: "Foo".to_string(),
                external_id: TemplateId::from("abc"),
            })
            .await
    });

    while harness.templates.calls.lock().unwrap().is_empty() {
        tokio::task::yield_now().await;
    }
    assert!(!harness.controller.view().loaded);

    gate.notify_one();
    assert!(matches!(
        import.await.expect("join"),
        ImportOutcome::Opened(_)
    ));
    assert!(!harness.controller.view().loaded);
}

#[tokio::test]
async fn title_follows_host_context() {
    let unknown = Harness::build(
        FakeStore::default(),
        FakeTemplates::default(),
        MemoryFlags::default(),
        FixedHostEnvironment::new(HostContext::unknown()),
    );
    assert_eq!(unknown.controller.title(), "");

    let excel = Harness::new(FakeStore::default());
    assert_eq!(excel.controller.title(), "Excel Snippets");
}

#[tokio::test]
async fn navigate_to_import_and_link_are_exposed() {
    let harness = Harness::new(FakeStore::default());

    harness.controller.navigate_to_import();

    assert_eq!(harness.routes(), vec![Route::Import]);
    assert_eq!(
        harness.controller.view().link.as_deref(),
        Some("https://example.com/import")
    );
}

#[tokio::test]
async fn dispatched_create_failure_surfaces_on_the_handle() {
    let harness = Harness::new(FakeStore {
        new_error: Some("quota exceeded".to_string()),
        ..FakeStore::default()
    });

    let result = dispatch(
        &harness.controller,
        GalleryCommand::Select { snippet: None },
    )
    .await
    .expect("join");

    assert!(result.is_err());
    assert!(harness.notices().is_empty());
}

#[tokio::test]
async fn dispatched_delete_reports_through_notifier() {
    let harness = Harness::new(FakeStore {
        delete_error: Some("locked".to_string()),
        ..FakeStore::with_snippets(vec![meta("x", "Snippet X")])
    });

    dispatch(
        &harness.controller,
        GalleryCommand::DeleteOne {
            snippet: meta("x", "Snippet X"),
        },
    )
    .await
    .expect("join")
    .expect("delete failures are handled locally");

    assert_eq!(harness.notices()[0].title, DELETE_SNIPPET_ERROR);
}
