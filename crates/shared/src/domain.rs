use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(SnippetId);
id_newtype!(TemplateId);

impl SnippetId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// How a store should treat a proposed snippet name that is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// Store the name verbatim, even when it collides.
    AsIs,
    /// Append ` (n)` until the name is unique.
    AutoSuffix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetMeta {
    pub id: SnippetId,
    pub name: String,
    #[serde(default)]
    pub template_id: Option<TemplateId>,
    pub modified_at: DateTime<Utc>,
}

impl SnippetMeta {
    /// A meta without an identity carries nothing the gallery can open.
    pub fn is_empty(&self) -> bool {
        self.id.is_blank()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetContent {
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub libraries: Vec<String>,
}

/// A snippet as it moves between the gallery and the store.
///
/// Drafts (fresh from a template, not yet stored) have a proposed name but no
/// meta; the store assigns the meta on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub meta: Option<SnippetMeta>,
    pub proposed_name: String,
    #[serde(default)]
    pub template_id: Option<TemplateId>,
    pub content: SnippetContent,
}

impl Snippet {
    pub fn draft(name: impl Into<String>, content: SnippetContent) -> Self {
        Self {
            meta: None,
            proposed_name: name.into(),
            template_id: None,
            content,
        }
    }

    pub fn from_template(
        template_id: TemplateId,
        name: impl Into<String>,
        content: SnippetContent,
    ) -> Self {
        Self {
            template_id: Some(template_id),
            ..Self::draft(name, content)
        }
    }

    pub fn id(&self) -> Option<&SnippetId> {
        self.meta.as_ref().map(|meta| &meta.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostKind {
    Unknown,
    Web,
    Excel,
    Word,
    PowerPoint,
    OneNote,
    Project,
}

impl HostKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "web" => Self::Web,
            "excel" => Self::Excel,
            "word" => Self::Word,
            "powerpoint" => Self::PowerPoint,
            "onenote" => Self::OneNote,
            "project" => Self::Project,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Web => "web",
            Self::Excel => "excel",
            Self::Word => "word",
            Self::PowerPoint => "powerpoint",
            Self::OneNote => "onenote",
            Self::Project => "project",
        }
    }
}

/// The display context the gallery is hosted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostContext {
    pub kind: HostKind,
    pub host_name: String,
}

impl HostContext {
    pub fn unknown() -> Self {
        Self {
            kind: HostKind::Unknown,
            host_name: String::new(),
        }
    }

    pub fn is_established(&self) -> bool {
        self.kind != HostKind::Unknown
    }
}
