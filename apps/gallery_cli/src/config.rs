use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use shared::domain::{HostContext, HostKind};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub template_dir: PathBuf,
    pub host_kind: HostKind,
    pub host_name: String,
    pub import_link: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/gallery.db".into(),
            template_dir: PathBuf::from("./templates"),
            host_kind: HostKind::Web,
            host_name: "Web".into(),
            import_link: None,
        }
    }
}

impl Settings {
    pub fn host_context(&self) -> HostContext {
        HostContext {
            kind: self.host_kind,
            host_name: self.host_name.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    database_url: Option<String>,
    template_dir: Option<PathBuf>,
    host_kind: Option<String>,
    host_name: Option<String>,
    import_link: Option<String>,
}

/// Defaults, then the optional TOML file, then environment overrides.
pub fn load_settings(config_path: &Path) -> Result<Settings> {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, file_cfg),
            Err(err) => warn!(
                path = %config_path.display(),
                error = %err,
                "ignoring malformed config file"
            ),
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    validate_import_link(&settings)?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.database_url {
        settings.database_url = v;
    }
    if let Some(v) = file_cfg.template_dir {
        settings.template_dir = v;
    }
    if let Some(v) = file_cfg.host_kind {
        settings.host_kind = HostKind::parse(&v);
    }
    if let Some(v) = file_cfg.host_name {
        settings.host_name = v;
    }
    if let Some(v) = file_cfg.import_link {
        settings.import_link = Some(v);
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("GALLERY_DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = lookup("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = lookup("APP__TEMPLATE_DIR") {
        settings.template_dir = PathBuf::from(v);
    }

    if let Some(v) = lookup("APP__HOST_KIND") {
        settings.host_kind = HostKind::parse(&v);
    }
    if let Some(v) = lookup("APP__HOST_NAME") {
        settings.host_name = v;
    }

    if let Some(v) = lookup("APP__IMPORT_LINK") {
        settings.import_link = Some(v);
    }
}

fn validate_import_link(settings: &Settings) -> Result<()> {
    if let Some(link) = &settings.import_link {
        url::Url::parse(link).with_context(|| format!("invalid import link '{link}'"))?;
    }
    Ok(())
}

/// Accepts a bare file path or any `sqlite:` form and yields a `sqlite://` URL.
/// Blank input falls back to the default database.
pub fn normalize_database_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return Settings::default().database_url;
    }
    if raw.contains("://") || raw.starts_with("sqlite::memory:") {
        return raw.to_string();
    }

    let path = raw.strip_prefix("sqlite:").unwrap_or(raw);
    format!("sqlite://{}", path.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
