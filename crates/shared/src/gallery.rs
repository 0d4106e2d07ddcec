use serde::{Deserialize, Serialize};

use crate::domain::{SnippetId, SnippetMeta, TemplateId};

/// Read projection of the snippets stored on this device, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalGallery(Vec<SnippetMeta>);

impl LocalGallery {
    pub fn new(entries: Vec<SnippetMeta>) -> Self {
        Self(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn entries(&self) -> &[SnippetMeta] {
        &self.0
    }

    pub fn contains(&self, id: &SnippetId) -> bool {
        self.0.iter().any(|meta| &meta.id == id)
    }

    pub fn find(&self, id: &SnippetId) -> Option<&SnippetMeta> {
        self.0.iter().find(|meta| &meta.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(alias = "gistId")]
    pub external_id: TemplateId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateCategory {
    pub name: String,
    #[serde(default)]
    pub items: Vec<TemplateEntry>,
}

/// Curated list of importable starter snippets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateGallery {
    #[serde(default)]
    pub categories: Vec<TemplateCategory>,
}

impl TemplateGallery {
    pub fn entries(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.categories.iter().flat_map(|category| category.items.iter())
    }

    pub fn find(&self, external_id: &TemplateId) -> Option<&TemplateEntry> {
        self.entries().find(|entry| &entry.external_id == external_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Route {
    Edit { id: SnippetId },
    Run { id: SnippetId, return_to_edit: bool },
    Import,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Edit { id } => format!("edit/{id}"),
            Self::Run { id, return_to_edit } => format!("run/{id}/{return_to_edit}"),
            Self::Import => "import".to_string(),
        }
    }
}
