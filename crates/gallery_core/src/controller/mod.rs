//! Landing screen controller: local snippet list, template gallery, and the
//! create/delete/import pipelines that feed them.

pub mod commands;
pub mod orchestration;

use std::sync::Arc;

use anyhow::{Context, Result};
use shared::{
    domain::{NamingPolicy, Snippet, SnippetId, SnippetMeta, TemplateId},
    gallery::{LocalGallery, Route, TemplateGallery},
};
use thiserror::Error;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::services::{
    catch_error, report_error, Confirmation, GalleryServices, UsageProperties,
};

pub const ONBOARDING_FLAG_KEY: &str = "Information";
pub const DELETE_SNIPPET_ERROR: &str = "Error deleting the snippet.";
pub const DELETE_ALL_ERROR: &str = "Error deleting snippets.";
pub const IMPORT_ERROR_TITLE: &str = "Could not create the snippet";
pub const IMPORT_ERROR_DESCRIPTION: &str = "An error occurred while creating the template snippet.";

const UI_ACTION: &str = "UI Action";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("store returned a snippet without an identity")]
    MissingIdentity,
}

/// State the hosting view renders. Replaced field by field, never patched in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryView {
    pub show_onboarding: bool,
    pub link: Option<String>,
    pub local_gallery: LocalGallery,
    pub template_gallery: Option<TemplateGallery>,
    pub template_gallery_error: Option<String>,
    /// False only while a template import is in flight.
    pub loaded: bool,
}

impl GalleryView {
    fn initial(link: Option<String>) -> Self {
        Self {
            show_onboarding: false,
            link,
            local_gallery: LocalGallery::default(),
            template_gallery: None,
            template_gallery_error: None,
            loaded: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GalleryOptions {
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateImport {
    pub name: String,
    pub external_id: TemplateId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateFetchOutcome {
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    Created(SnippetId),
    Opened(SnippetId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Opened(SnippetId),
    Failed,
}

#[derive(Clone)]
pub struct GalleryController {
    services: GalleryServices,
    state: Arc<watch::Sender<GalleryView>>,
}

impl GalleryController {
    pub fn new(services: GalleryServices, options: GalleryOptions) -> Self {
        let (state, _) = watch::channel(GalleryView::initial(options.link));
        Self {
            services,
            state: Arc::new(state),
        }
    }

    /// Every state change wakes subscribers; this is the view refresh signal.
    pub fn subscribe(&self) -> watch::Receiver<GalleryView> {
        self.state.subscribe()
    }

    pub fn view(&self) -> GalleryView {
        self.state.borrow().clone()
    }

    /// Loads the local list and onboarding state, then spawns the template
    /// gallery fetch. Returns `None` when the host context is not usable.
    pub async fn activate(&self) -> Option<JoinHandle<TemplateFetchOutcome>> {
        if !self.services.host.ensure_context() {
            debug!("host context unavailable; gallery activation aborted");
            return None;
        }

        let local_gallery = self.services.store.local();
        let seen = match self.services.flags.get(ONBOARDING_FLAG_KEY).await {
            Ok(seen) => seen,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "failed to read onboarding flag");
                false
            }
        };
        let show_onboarding = !local_gallery.is_empty() && !seen;
        debug!(
            snippets = local_gallery.len(),
            show_onboarding, "local gallery loaded"
        );

        self.state.send_modify(|view| {
            view.local_gallery = local_gallery;
            view.show_onboarding = show_onboarding;
        });

        let controller = self.clone();
        Some(tokio::spawn(async move {
            controller.load_template_gallery().await
        }))
    }

    pub async fn load_template_gallery(&self) -> TemplateFetchOutcome {
        match self.services.store.template_gallery().await {
            Ok(gallery) => {
                debug!(
                    categories = gallery.categories.len(),
                    "template gallery loaded"
                );
                self.state.send_modify(|view| {
                    view.template_gallery = Some(gallery);
                    view.template_gallery_error = None;
                });
                TemplateFetchOutcome::Loaded
            }
            Err(err) => {
                let message = format!("{err:#}");
                warn!(error = %message, "template gallery fetch failed");
                self.state.send_modify(|view| {
                    view.template_gallery = None;
                    view.template_gallery_error = Some(message.clone());
                });
                TemplateFetchOutcome::Failed(message)
            }
        }
    }

    pub async fn dismiss_onboarding(&self) {
        self.state.send_modify(|view| view.show_onboarding = false);
        if let Err(err) = self.services.flags.set(ONBOARDING_FLAG_KEY, true).await {
            warn!(error = %format!("{err:#}"), "failed to persist onboarding flag");
        }
    }

    pub async fn delete_one(&self, snippet: &SnippetMeta) -> DeleteOutcome {
        self.emit(
            "Delete snippet",
            [
                ("id", snippet.id.to_string()),
                ("name", snippet.name.clone()),
            ],
        );

        match self
            .services
            .store
            .delete(snippet, Confirmation::Required)
            .await
        {
            Ok(()) => {
                self.refresh_local_gallery();
                DeleteOutcome::Deleted
            }
            Err(err) => {
                catch_error(self.services.notifier.as_ref(), DELETE_SNIPPET_ERROR, &[])(&err);
                DeleteOutcome::Failed
            }
        }
    }

    pub async fn delete_all(&self) -> DeleteOutcome {
        self.emit("Delete all snippets", []);

        match self.services.store.delete_all(Confirmation::Required).await {
            Ok(()) => {
                self.refresh_local_gallery();
                DeleteOutcome::Deleted
            }
            Err(err) => {
                catch_error(self.services.notifier.as_ref(), DELETE_ALL_ERROR, &[])(&err);
                DeleteOutcome::Failed
            }
        }
    }

    pub fn run(&self, snippet: &SnippetMeta) {
        self.emit("Run from new", []);
        self.services.navigator.go_to(Route::Run {
            id: snippet.id.clone(),
            return_to_edit: false,
        });
    }

    /// Opens an existing snippet, or creates a blank one when none is given.
    ///
    /// Unlike delete and import, a failure to create is returned to the caller
    /// without notifying the user.
    pub async fn select(&self, snippet: Option<&SnippetMeta>) -> Result<SelectOutcome> {
        let Some(meta) = snippet.filter(|meta| !meta.is_empty()) else {
            self.emit("Create new snippet", []);
            let created = self.services.store.new_snippet().await?;
            let id = stored_identity(&created)?;
            self.refresh_local_gallery();
            self.services.navigator.go_to(Route::Edit { id: id.clone() });
            return Ok(SelectOutcome::Created(id));
        };

        self.emit(
            "Select snippet",
            [("id", meta.id.to_string()), ("name", meta.name.clone())],
        );
        self.services.navigator.go_to(Route::Edit {
            id: meta.id.clone(),
        });
        Ok(SelectOutcome::Opened(meta.id.clone()))
    }

    pub async fn import_from_template(&self, request: TemplateImport) -> ImportOutcome {
        let context = self.services.host.context();
        self.emit(
            "CreateFromTemplate",
            [
                ("context", context.kind.as_str().to_string()),
                ("templateName", request.name.clone()),
                ("templateId", request.external_id.to_string()),
            ],
        );

        self.state.send_modify(|view| view.loaded = false);

        match self.create_from_template(&request).await {
            Ok(id) => {
                info!(snippet_id = %id, template_id = %request.external_id, "template imported");
                ImportOutcome::Opened(id)
            }
            Err(err) => {
                self.state.send_modify(|view| view.loaded = true);
                report_error(
                    self.services.notifier.as_ref(),
                    IMPORT_ERROR_TITLE,
                    IMPORT_ERROR_DESCRIPTION,
                    &err,
                );
                ImportOutcome::Failed
            }
        }
    }

    pub fn navigate_to_import(&self) {
        self.services.navigator.go_to(Route::Import);
    }

    /// Recomputed on every call; the host context can change underneath us.
    pub fn title(&self) -> String {
        let context = self.services.host.context();
        if !context.is_established() {
            return String::new();
        }

        format!("{} Snippets", context.host_name)
    }

    async fn create_from_template(&self, request: &TemplateImport) -> Result<SnippetId> {
        let draft = self
            .services
            .templates
            .materialize(&request.external_id, &request.name)
            .await
            .with_context(|| format!("failed to load template {}", request.external_id))?;

        // Template names are curated, so collisions are kept rather than suffixed.
        let stored = self
            .services
            .store
            .create(draft, NamingPolicy::AsIs)
            .await
            .context("failed to store the template snippet")?;
        let id = stored_identity(&stored)?;

        self.refresh_local_gallery();
        self.services.navigator.go_to(Route::Edit { id: id.clone() });
        Ok(id)
    }

    fn refresh_local_gallery(&self) {
        let local_gallery = self.services.store.local();
        self.state
            .send_modify(|view| view.local_gallery = local_gallery);
    }

    fn emit<const N: usize>(&self, event: &str, extra: [(&'static str, String); N]) {
        let mut properties = UsageProperties::new();
        properties.insert("type", UI_ACTION.to_string());
        properties.extend(extra);
        self.services.usage.emit(event, &properties);
    }
}

fn stored_identity(snippet: &Snippet) -> Result<SnippetId> {
    snippet
        .id()
        .cloned()
        .ok_or_else(|| PipelineError::MissingIdentity.into())
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
