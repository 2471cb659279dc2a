//! Static source definitions
//!
//! `SourceDto` is the raw, deserialized form of one `[[sources]]` table.
//! `SourceConfig` is the validated mount point the resolver works with.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Index files tried for directories when a source lists none
pub const DEFAULT_FILES: [&str; 3] = ["index.html", "index.htm", "index.txt"];

/// Allow-list rule meaning "everything under this segment"
pub const ALLOW_ALL: &str = ".";

/// Raw source configuration as it appears in the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceDto {
    pub root: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    /// Top-level segment -> permitted sub-paths
    #[serde(default)]
    pub allow: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    pub defaults: Vec<String>,
}

impl SourceDto {
    pub fn new(root: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            root: Some(root.into()),
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn allow<I, S>(mut self, segment: impl Into<String>, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow
            .get_or_insert_with(HashMap::new)
            .insert(segment.into(), rules.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn defaults<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults = names.into_iter().map(Into::into).collect();
        self
    }
}

/// One validated static-file mount point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    root: PathBuf,
    prefix: String,
    allow: Option<HashMap<String, Vec<String>>>,
    defaults: Vec<String>,
}

impl SourceConfig {
    /// Validate and normalize a raw source definition
    pub fn from_dto(dto: &SourceDto) -> Result<Self> {
        let root = dto
            .root
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| Error::InvalidSource("field 'root' must be a non-empty path".into()))?;

        let allow = match &dto.allow {
            Some(map) => Some(normalize_allow(map)?),
            None => None,
        };

        let defaults = if dto.defaults.is_empty() {
            DEFAULT_FILES.iter().map(ToString::to_string).collect()
        } else {
            if let Some(bad) = dto.defaults.iter().find(|d| !is_plain_file_name(d)) {
                return Err(Error::InvalidSource(format!(
                    "default file '{bad}' must be a plain file name"
                )));
            }
            dto.defaults.clone()
        };

        Ok(Self {
            root: resolve_root(Path::new(root))?,
            prefix: normalize_prefix(dto.prefix.as_deref().unwrap_or("/")),
            allow,
            defaults,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub const fn allow(&self) -> Option<&HashMap<String, Vec<String>>> {
        self.allow.as_ref()
    }

    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }
}

/// Make the root absolute, resolving symlinks when it already exists
fn resolve_root(root: &Path) -> Result<PathBuf> {
    match std::fs::canonicalize(root) {
        Ok(canonical) => Ok(canonical),
        Err(_) => Ok(std::path::absolute(root)?),
    }
}

/// Prefixes always start and end with `/`
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

fn normalize_allow(raw: &HashMap<String, Vec<String>>) -> Result<HashMap<String, Vec<String>>> {
    let mut allow = HashMap::with_capacity(raw.len());
    for (segment, rules) in raw {
        let key = normalize_rule(segment);
        if key.is_empty() {
            return Err(Error::InvalidSource(format!(
                "allow key '{segment}' must name a directory"
            )));
        }
        let rules = rules
            .iter()
            .map(|r| normalize_rule(r))
            .filter(|r| !r.is_empty())
            .collect();
        allow.insert(key, rules);
    }
    Ok(allow)
}

fn normalize_rule(rule: &str) -> String {
    let trimmed = rule.trim();
    if trimmed == ALLOW_ALL {
        return ALLOW_ALL.to_string();
    }
    trimmed.trim_matches('/').to_string()
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
