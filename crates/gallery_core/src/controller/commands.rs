//! User actions queued from the hosting view to the gallery controller.

use shared::domain::SnippetMeta;

use super::TemplateImport;

#[derive(Debug, Clone)]
pub enum GalleryCommand {
    DismissOnboarding,
    DeleteOne { snippet: SnippetMeta },
    DeleteAll,
    Run { snippet: SnippetMeta },
    Select { snippet: Option<SnippetMeta> },
    ImportFromTemplate(TemplateImport),
    NavigateToImport,
    ReloadTemplateGallery,
}

impl GalleryCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DismissOnboarding => "dismiss_onboarding",
            Self::DeleteOne { .. } => "delete_one",
            Self::DeleteAll => "delete_all",
            Self::Run { .. } => "run",
            Self::Select { .. } => "select",
            Self::ImportFromTemplate(_) => "import_from_template",
            Self::NavigateToImport => "navigate_to_import",
            Self::ReloadTemplateGallery => "reload_template_gallery",
        }
    }
}
