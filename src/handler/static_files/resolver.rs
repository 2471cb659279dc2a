//! Path resolution with allow-list enforcement
//!
//! Maps a prefix-relative URL path onto a filesystem path under a source root.
//! The result is tagged so callers decide how to treat a denial.

use super::source::{SourceConfig, ALLOW_ALL};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Outcome of resolving a relative path against one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Path is permitted; it may or may not exist on disk
    Found(PathBuf),
    /// Path is outside the allow-list
    NotFound,
    /// Path attempts to escape the root
    Denied(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Contains a `..` segment
    Traversal,
    /// Given as an absolute path
    AbsolutePath,
    /// Joined path does not stay under the root
    OutsideRoot,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Traversal => "parent directory segment",
            Self::AbsolutePath => "absolute path",
            Self::OutsideRoot => "resolved outside root",
        })
    }
}

/// Resolve `rel` (URL path with the source prefix stripped) under `config.root`
pub fn resolve(config: &SourceConfig, rel: &str) -> Resolution {
    if rel.starts_with('/') {
        return Resolution::Denied(DenyReason::AbsolutePath);
    }
    for component in Path::new(rel).components() {
        match component {
            Component::ParentDir => return Resolution::Denied(DenyReason::Traversal),
            Component::RootDir | Component::Prefix(_) => {
                return Resolution::Denied(DenyReason::AbsolutePath)
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    if let Some(allow) = config.allow() {
        let Some((segment, sub_path)) = match_segment(allow.keys(), rel) else {
            return Resolution::NotFound;
        };
        let rules = allow.get(segment).map_or(&[][..], Vec::as_slice);
        if !is_permitted(rules, sub_path) {
            return Resolution::NotFound;
        }
    }

    let candidate = config.root().join(rel);
    if !candidate.starts_with(config.root()) {
        return Resolution::Denied(DenyReason::OutsideRoot);
    }
    Resolution::Found(candidate)
}

/// Find the longest allow key that is `rel` itself or a leading directory of it.
///
/// Returns the key and the remainder of `rel` after it. The root-level key `.`
/// matches anything, with the whole of `rel` as the remainder, but only when no
/// named key matches. Named keys are never shadowed by `.`; a `.` entry that took
/// precedence would make every other key unreachable.
fn match_segment<'a, 'k, I>(keys: I, rel: &'a str) -> Option<(&'k str, &'a str)>
where
    I: Iterator<Item = &'k String>,
{
    let mut root_level = None;
    let mut best: Option<(&'k str, &'a str)> = None;

    for key in keys {
        if key == ALLOW_ALL {
            root_level = Some((key.as_str(), rel));
            continue;
        }
        let Some(rest) = rel.strip_prefix(key.as_str()) else {
            continue;
        };
        let sub_path = if rest.is_empty() {
            rest
        } else if let Some(stripped) = rest.strip_prefix('/') {
            stripped
        } else {
            continue;
        };
        if best.map_or(true, |(k, _)| key.len() > k.len()) {
            best = Some((key.as_str(), sub_path));
        }
    }

    best.or(root_level)
}

/// `.` permits everything; otherwise `sub_path` must be a rule or lie under one
fn is_permitted(rules: &[String], sub_path: &str) -> bool {
    rules.iter().any(|rule| {
        rule == ALLOW_ALL
            || sub_path == rule
            || sub_path
                .strip_prefix(rule.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    })
}
