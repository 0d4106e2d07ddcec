//! Snippet gallery orchestration: the landing screen controller and the
//! collaborator contracts it drives.

pub mod catalog;
pub mod controller;
mod durable_store;
pub mod services;

pub use catalog::DirectoryTemplateSource;
pub use controller::{
    commands::GalleryCommand, orchestration::dispatch, DeleteOutcome, GalleryController,
    GalleryOptions, GalleryView, ImportOutcome, SelectOutcome, TemplateFetchOutcome,
    TemplateImport,
};
pub use durable_store::{DurableSnippetStore, StorageFlagStore};
pub use services::{
    catch_error, report_error, Confirmation, ConfirmationPrompt, FixedHostEnvironment, FlagStore,
    GalleryServices, HostEnvironment, Navigator, Notice, Notifier, SnippetStore, TemplateSource,
    TracingUsageSignal, UsageProperties, UsageSignal,
};
