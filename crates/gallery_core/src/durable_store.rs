use std::{
    collections::HashSet,
    sync::{Arc, PoisonError, RwLock},
};

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::{NamingPolicy, Snippet, SnippetContent, SnippetId, SnippetMeta},
    error::StoreError,
    gallery::{LocalGallery, TemplateGallery},
};
use storage::{Storage, StoredSnippet};
use tracing::{debug, info, warn};

use crate::services::{Confirmation, ConfirmationPrompt, FlagStore, SnippetStore, TemplateSource};

pub const BLANK_SNIPPET_NAME: &str = "New Snippet";

fn blank_content() -> SnippetContent {
    SnippetContent {
        script: "document.getElementById(\"run\").addEventListener(\"click\", () => {\n    console.log(\"Hello world\");\n});\n".to_string(),
        template: "<button id=\"run\">Run</button>\n".to_string(),
        style: String::new(),
        libraries: Vec::new(),
    }
}

/// Snippet store backed by SQLite with an in-memory projection for `local()`.
pub struct DurableSnippetStore {
    storage: Storage,
    templates: Arc<dyn TemplateSource>,
    confirmer: Arc<dyn ConfirmationPrompt>,
    cache: RwLock<LocalGallery>,
}

impl DurableSnippetStore {
    pub async fn open(
        storage: Storage,
        templates: Arc<dyn TemplateSource>,
        confirmer: Arc<dyn ConfirmationPrompt>,
    ) -> Result<Self> {
        let store = Self {
            storage,
            templates,
            confirmer,
            cache: RwLock::new(LocalGallery::default()),
        };
        store.reload().await?;
        Ok(store)
    }

    /// Re-reads the local list from the database into the cache.
    pub async fn reload(&self) -> Result<()> {
        let snippets = self.storage.list_snippets().await?;
        let gallery = LocalGallery::new(snippets.iter().map(StoredSnippet::meta).collect());
        debug!(snippets = gallery.len(), "local snippet cache reloaded");
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = gallery;
        Ok(())
    }

    /// Refreshes the cache after a committed write, falling back to applying
    /// the change to the cached list when the database cannot be re-read.
    async fn reload_after_write(&self, apply: impl FnOnce(&mut Vec<SnippetMeta>)) {
        if let Err(err) = self.reload().await {
            warn!(error = %format!("{err:#}"), "snippet cache re-read failed after write");
            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            let mut entries = cache.entries().to_vec();
            apply(&mut entries);
            *cache = LocalGallery::new(entries);
        }
    }

    async fn confirmed(&self, confirmation: Confirmation, title: &str, message: &str) -> bool {
        match confirmation {
            Confirmation::NotRequired => true,
            Confirmation::Required => self.confirmer.confirm(title, message).await,
        }
    }
}

#[async_trait]
impl SnippetStore for DurableSnippetStore {
    fn local(&self) -> LocalGallery {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn template_gallery(&self) -> Result<TemplateGallery> {
        self.templates.gallery().await
    }

    async fn new_snippet(&self) -> Result<Snippet> {
        self.create(
            Snippet::draft(BLANK_SNIPPET_NAME, blank_content()),
            NamingPolicy::AutoSuffix,
        )
        .await
    }

    async fn create(&self, snippet: Snippet, naming: NamingPolicy) -> Result<Snippet> {
        if snippet.proposed_name.trim().is_empty() {
            bail!("snippet name must not be empty");
        }

        let name = match naming {
            NamingPolicy::AsIs => snippet.proposed_name,
            NamingPolicy::AutoSuffix => {
                let taken = self.storage.snippet_names().await?;
                unique_name(&snippet.proposed_name, &taken)
            }
        };

        let now = Utc::now();
        let stored = StoredSnippet {
            id: SnippetId::generate(),
            name,
            template_id: snippet.template_id,
            content: snippet.content,
            created_at: now,
            modified_at: now,
        };
        self.storage.insert_snippet(&stored).await?;
        let created = stored.meta();
        self.reload_after_write(|entries| entries.insert(0, created)).await;

        info!(snippet_id = %stored.id, name = %stored.name, ?naming, "snippet created");
        Ok(stored.into_snippet())
    }

    async fn delete(&self, snippet: &SnippetMeta, confirmation: Confirmation) -> Result<()> {
        let message = format!("Are you sure you want to delete '{}'?", snippet.name);
        if !self
            .confirmed(confirmation, "Delete snippet", &message)
            .await
        {
            return Err(StoreError::Declined.into());
        }

        if !self.storage.delete_snippet(&snippet.id).await? {
            return Err(StoreError::NotFound(snippet.id.clone()).into());
        }
        self.reload_after_write(|entries| entries.retain(|meta| meta.id != snippet.id)).await;

        info!(snippet_id = %snippet.id, "snippet deleted");
        Ok(())
    }

    async fn delete_all(&self, confirmation: Confirmation) -> Result<()> {
        if !self
            .confirmed(
                confirmation,
                "Delete all snippets",
                "Are you sure you want to delete all of your local snippets?",
            )
            .await
        {
            return Err(StoreError::Declined.into());
        }

        let removed = self.storage.delete_all_snippets().await?;
        self.reload_after_write(|entries| entries.clear()).await;

        info!(removed, "all snippets deleted");
        Ok(())
    }
}

/// First of `base`, `base (1)`, `base (2)`, ... not already taken.
fn unique_name(base: &str, taken: &[String]) -> String {
    let taken: HashSet<&str> = taken.iter().map(String::as_str).collect();
    if !taken.contains(base) {
        return base.to_string();
    }

    (1..)
        .map(|n| format!("{base} ({n})"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}

pub struct StorageFlagStore {
    storage: Storage,
}

impl StorageFlagStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl FlagStore for StorageFlagStore {
    async fn get(&self, key: &str) -> Result<bool> {
        Ok(self.storage.get_flag(key).await?.unwrap_or(false))
    }

    async fn set(&self, key: &str, value: bool) -> Result<()> {
        self.storage.set_flag(key, value).await
    }
}

#[cfg(test)]
#[path = "tests/durable_store_tests.rs"]
mod tests;
