use thiserror::Error;

use crate::domain::{SnippetId, TemplateId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("the user declined the confirmation")]
    Declined,
    #[error("snippet {0} was not found")]
    NotFound(SnippetId),
    #[error("template {id} could not be loaded: {message}")]
    Catalog { id: TemplateId, message: String },
    #[error("template gallery is unavailable: {0}")]
    GalleryUnavailable(String),
}

impl StoreError {
    pub fn catalog(id: &TemplateId, message: impl Into<String>) -> Self {
        Self::Catalog {
            id: id.clone(),
            message: message.into(),
        }
    }

    /// True when the failure reflects a user choice rather than a fault.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::Declined)
    }
}
