//! Boxes: a named roster plus game metadata, persisted as one JSON file each.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::roster::{EntryRecord, Roster, RosterError};
use crate::data::scores::ScoreTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// One creature per entry.
    Standard,
    /// Bonded pairs per entry.
    Soullink,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Soullink => "soullink",
        }
    }

    fn accepts(&self, record: &EntryRecord) -> bool {
        matches!(
            (self, record),
            (Self::Standard, EntryRecord::Solo(_)) | (Self::Soullink, EntryRecord::Pair { .. })
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown box category '{0}' (expected standard or soullink)")]
pub struct CategoryParseError(pub String);

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "soullink" | "soullocke" => Ok(Self::Soullink),
            other => Err(CategoryParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxRecord {
    pub name: String,
    pub game: String,
    pub category: Category,
    #[serde(default)]
    pub players: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
}

impl BoxRecord {
    pub fn new(
        name: impl Into<String>,
        game: impl Into<String>,
        category: Category,
        players: Vec<String>,
    ) -> Self {
        let now = timestamp();
        Self {
            name: name.into(),
            game: game.into(),
            category,
            players,
            created_at: now.clone(),
            updated_at: now,
            entries: Vec::new(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = timestamp();
    }

    /// Scores the entries into a roster, rejecting entries of the wrong shape.
    pub fn roster(&self, scores: &ScoreTable) -> Result<Roster, RosterError> {
        if let Some(stray) = self
            .entries
            .iter()
            .find(|record| !self.category.accepts(record))
        {
            let entry = stray
                .members()
                .iter()
                .map(|member| member.name.as_str())
                .collect::<Vec<_>>()
                .join(" & ");
            return Err(RosterError::CategoryMismatch {
                entry,
                category: self.category.to_string(),
            });
        }
        Roster::build(&self.entries, scores)
    }
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error at '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid box file '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("box '{0}' not found")]
    UnknownBox(String),
    #[error("box '{0}' already exists")]
    AlreadyExists(String),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Lowercase ASCII slug: whitespace and dash runs become one dash, anything
/// else that is not alphanumeric, `_` or `-` is dropped.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for ch in value.trim().chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        }
    }
    let slug = slug.trim_matches(|ch| ch == '-' || ch == '_').to_string();
    if slug.is_empty() {
        "box".to_string()
    } else {
        slug
    }
}

/// JSON box store rooted at the configured data directory.
#[derive(Debug, Clone)]
pub struct BoxStore {
    root: PathBuf,
}

impl BoxStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn boxes_dir(&self) -> PathBuf {
        self.root.join("boxes")
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.boxes_dir().join(format!("{}.json", slugify(name)))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// All stored boxes sorted by name. A missing store is empty.
    pub fn list(&self) -> Result<Vec<BoxRecord>, StoreError> {
        let dir = self.boxes_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut boxes = Vec::new();
        for entry in fs::read_dir(&dir).map_err(io_error(&dir))? {
            let path = entry.map_err(io_error(&dir))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            boxes.push(read_record(&path)?);
        }
        boxes.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(boxes)
    }

    pub fn load(&self, name: &str) -> Result<BoxRecord, StoreError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(StoreError::UnknownBox(name.to_string()));
        }
        read_record(&path)
    }

    pub fn save(&self, record: &BoxRecord) -> Result<PathBuf, StoreError> {
        let dir = self.boxes_dir();
        fs::create_dir_all(&dir).map_err(io_error(&dir))?;
        let path = self.path_for(&record.name);
        let payload = serde_json::to_string_pretty(record).map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(&path, payload).map_err(io_error(&path))?;
        log::info!("saved box '{}' to {}", record.name, path.display());
        Ok(path)
    }

    pub fn create(&self, record: &BoxRecord) -> Result<PathBuf, StoreError> {
        if self.exists(&record.name) {
            return Err(StoreError::AlreadyExists(record.name.clone()));
        }
        self.save(record)
    }

    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(StoreError::UnknownBox(name.to_string()));
        }
        fs::remove_file(&path).map_err(io_error(&path))?;
        log::info!("deleted box '{name}'");
        Ok(())
    }

    pub fn rename(&self, old: &str, new: &str) -> Result<BoxRecord, StoreError> {
        let mut record = self.load(old)?;
        let old_path = self.path_for(old);
        let new_path = self.path_for(new);
        if new_path != old_path && new_path.is_file() {
            return Err(StoreError::AlreadyExists(new.to_string()));
        }
        record.name = new.to_string();
        record.touch();
        self.save(&record)?;
        if new_path != old_path {
            fs::remove_file(&old_path).map_err(io_error(&old_path))?;
        }
        Ok(record)
    }
}

fn read_record(path: &Path) -> Result<BoxRecord, StoreError> {
    let raw = fs::read_to_string(path).map_err(io_error(path))?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Json {
        path: path.display().to_string(),
        source,
    })
}
