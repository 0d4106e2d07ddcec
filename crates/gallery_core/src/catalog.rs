//! Template catalog stored in a local directory.
//!
//! `gallery.json` lists the categorized templates; every template body lives
//! next to it as `<external id>.json`.

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{Snippet, SnippetContent, TemplateId},
    error::StoreError,
    gallery::TemplateGallery,
};
use tracing::debug;

use crate::services::TemplateSource;

pub const GALLERY_FILE: &str = "gallery.json";

pub struct DirectoryTemplateSource {
    root: PathBuf,
}

impl DirectoryTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

fn is_valid_external_id(id: &TemplateId) -> bool {
    !id.is_blank()
        && id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait]
impl TemplateSource for DirectoryTemplateSource {
    async fn gallery(&self) -> Result<TemplateGallery> {
        let path = self.root.join(GALLERY_FILE);
        let raw = tokio::fs::read_to_string(&path).await.map_err(|err| {
            StoreError::GalleryUnavailable(format!("cannot read {}: {err}", path.display()))
        })?;
        let gallery: TemplateGallery = serde_json::from_str(&raw).map_err(|err| {
            StoreError::GalleryUnavailable(format!("malformed {}: {err}", path.display()))
        })?;

        debug!(
            path = %path.display(),
            templates = gallery.entries().count(),
            "template gallery read"
        );
        Ok(gallery)
    }

    async fn materialize(&self, external_id: &TemplateId, name: &str) -> Result<Snippet> {
        // Ids become file names; refuse anything that could leave the catalog root.
        if !is_valid_external_id(external_id) {
            return Err(StoreError::catalog(external_id, "invalid template identifier").into());
        }

        let path = self.root.join(format!("{external_id}.json"));
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| StoreError::catalog(external_id, format!("cannot read template: {err}")))?;
        let content: SnippetContent = serde_json::from_str(&raw)
            .map_err(|err| StoreError::catalog(external_id, format!("malformed template: {err}")))?;

        Ok(Snippet::from_template(external_id.clone(), name, content))
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
