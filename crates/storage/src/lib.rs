use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{Snippet, SnippetContent, SnippetId, SnippetMeta, TemplateId};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSnippet {
    pub id: SnippetId,
    pub name: String,
    pub template_id: Option<TemplateId>,
    pub content: SnippetContent,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl StoredSnippet {
    pub fn meta(&self) -> SnippetMeta {
        SnippetMeta {
            id: self.id.clone(),
            name: self.name.clone(),
            template_id: self.template_id.clone(),
            modified_at: self.modified_at,
        }
    }

    pub fn into_snippet(self) -> Snippet {
        let meta = self.meta();
        Snippet {
            proposed_name: meta.name.clone(),
            template_id: meta.template_id.clone(),
            meta: Some(meta),
            content: self.content,
        }
    }
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every in-memory connection is its own database.
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            5
        };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Most recently modified first.
    pub async fn list_snippets(&self) -> Result<Vec<StoredSnippet>> {
        let rows = sqlx::query(
            "SELECT id, name, template_id, script, template, style, libraries, created_at, modified_at
             FROM snippets
             ORDER BY modified_at DESC, name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list snippets")?;

        rows.iter().map(snippet_from_row).collect()
    }

    pub async fn get_snippet(&self, id: &SnippetId) -> Result<Option<StoredSnippet>> {
        let row = sqlx::query(
            "SELECT id, name, template_id, script, template, style, libraries, created_at, modified_at
             FROM snippets
             WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to load snippet {id}"))?;

        row.as_ref().map(snippet_from_row).transpose()
    }

    pub async fn insert_snippet(&self, snippet: &StoredSnippet) -> Result<()> {
        let libraries = serde_json::to_string(&snippet.content.libraries)
            .context("failed to encode snippet libraries")?;

        sqlx::query(
            "INSERT INTO snippets
                (id, name, template_id, script, template, style, libraries, created_at, modified_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(snippet.id.as_str())
        .bind(&snippet.name)
        .bind(snippet.template_id.as_ref().map(TemplateId::as_str))
        .bind(&snippet.content.script)
        .bind(&snippet.content.template)
        .bind(&snippet.content.style)
        .bind(libraries)
        .bind(snippet.created_at)
        .bind(snippet.modified_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to insert snippet {}", snippet.id))?;

        Ok(())
    }

    /// Returns whether a row was removed.
    pub async fn delete_snippet(&self, id: &SnippetId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM snippets WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete snippet {id}"))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_all_snippets(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM snippets")
            .execute(&self.pool)
            .await
            .context("failed to delete snippets")?;
        Ok(result.rows_affected())
    }

    pub async fn snippet_names(&self) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT name FROM snippets ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .context("failed to list snippet names")
    }

    pub async fn get_flag(&self, key: &str) -> Result<Option<bool>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read setting '{key}'"))?;

        Ok(value.map(|raw| raw == "true"))
    }

    pub async fn set_flag(&self, key: &str, value: bool) -> Result<()> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(if value { "true" } else { "false" })
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to write setting '{key}'"))?;
        Ok(())
    }
}

fn snippet_from_row(row: &SqliteRow) -> Result<StoredSnippet> {
    let libraries: String = row.try_get("libraries")?;
    let template_id: Option<String> = row.try_get("template_id")?;

    Ok(StoredSnippet {
        id: SnippetId(row.try_get("id")?),
        name: row.try_get("name")?,
        template_id: template_id.map(TemplateId),
        content: SnippetContent {
            script: row.try_get("script")?,
            template: row.try_get("template")?,
            style: row.try_get("style")?,
            libraries: serde_json::from_str(&libraries)
                .context("stored snippet libraries are not a JSON array")?,
        },
        created_at: row.try_get("created_at")?,
        modified_at: row.try_get("modified_at")?,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.contains(":memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
