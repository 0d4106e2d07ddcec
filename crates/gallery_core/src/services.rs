//! Collaborator contracts consumed by the gallery controller.

use std::{collections::BTreeMap, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{HostContext, NamingPolicy, Snippet, SnippetMeta, TemplateId},
    error::StoreError,
    gallery::{LocalGallery, Route, TemplateGallery},
};
use tracing::{error, info};

/// Whether a destructive store operation must ask the user first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Required,
    NotRequired,
}

#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Cached read of the local list; never touches the database.
    fn local(&self) -> LocalGallery;
    async fn template_gallery(&self) -> Result<TemplateGallery>;
    async fn new_snippet(&self) -> Result<Snippet>;
    async fn create(&self, snippet: Snippet, naming: NamingPolicy) -> Result<Snippet>;
    async fn delete(&self, snippet: &SnippetMeta, confirmation: Confirmation) -> Result<()>;
    async fn delete_all(&self, confirmation: Confirmation) -> Result<()>;
}

#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn gallery(&self) -> Result<TemplateGallery>;
    /// Builds an unsaved snippet from an external template.
    async fn materialize(&self, external_id: &TemplateId, name: &str) -> Result<Snippet>;
}

pub trait Navigator: Send + Sync {
    fn go_to(&self, route: Route);
}

#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Absent flags read as `false`.
    async fn get(&self, key: &str) -> Result<bool>;
    async fn set(&self, key: &str, value: bool) -> Result<()>;
}

pub trait HostEnvironment: Send + Sync {
    fn ensure_context(&self) -> bool;
    fn context(&self) -> HostContext;
}

#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    async fn confirm(&self, title: &str, message: &str) -> bool;
}

pub type UsageProperties = BTreeMap<&'static str, String>;

/// Side channel for usage events. Implementations must not panic or block.
pub trait UsageSignal: Send + Sync {
    fn emit(&self, event: &str, properties: &UsageProperties);
}

pub struct TracingUsageSignal;

impl UsageSignal for TracingUsageSignal {
    fn emit(&self, event: &str, properties: &UsageProperties) {
        info!(target: "usage", event, ?properties, "usage signal");
    }
}

pub struct FixedHostEnvironment {
    context: HostContext,
    valid: bool,
}

impl FixedHostEnvironment {
    pub fn new(context: HostContext) -> Self {
        Self {
            context,
            valid: true,
        }
    }

    pub fn invalid() -> Self {
        Self {
            context: HostContext::unknown(),
            valid: false,
        }
    }
}

impl HostEnvironment for FixedHostEnvironment {
    fn ensure_context(&self) -> bool {
        self.valid
    }

    fn context(&self) -> HostContext {
        self.context.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: Option<String>,
    pub details: Vec<String>,
    pub cause: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Detailed error notification: title, description and the underlying cause.
pub fn report_error(
    notifier: &dyn Notifier,
    title: &str,
    description: &str,
    cause: &anyhow::Error,
) {
    error!(title, error = %format!("{cause:#}"), "reporting error to user");
    notifier.notify(Notice {
        title: title.to_string(),
        description: Some(description.to_string()),
        details: Vec::new(),
        cause: format!("{cause:#}"),
    });
}

/// Adapter for failure continuations that only carry a fixed title.
pub fn catch_error<'a>(
    notifier: &'a dyn Notifier,
    title: &'a str,
    extra: &'a [&'a str],
) -> impl FnOnce(&anyhow::Error) + 'a {
    move |cause| {
        let declined = cause
            .downcast_ref::<StoreError>()
            .is_some_and(StoreError::is_expected);
        if declined {
            info!(title, "operation declined by the user");
        } else {
            error!(title, error = %format!("{cause:#}"), "operation failed");
        }
        notifier.notify(Notice {
            title: title.to_string(),
            description: None,
            details: extra.iter().map(|line| line.to_string()).collect(),
            cause: format!("{cause:#}"),
        });
    }
}

#[derive(Clone)]
pub struct GalleryServices {
    pub store: Arc<dyn SnippetStore>,
    pub templates: Arc<dyn TemplateSource>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub usage: Arc<dyn UsageSignal>,
    pub flags: Arc<dyn FlagStore>,
    pub host: Arc<dyn HostEnvironment>,
}
