//! Request processing stages

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Phase of the per-request handler pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Stage {
    /// Runs first for every request (logging, authentication, ...)
    Pre,
    /// Runs in order until one handler claims the request
    Process,
    /// Always runs last, even when an earlier stage failed
    Post,
}

impl Stage {
    pub const ALL: [Self; 3] = [Self::Pre, Self::Process, Self::Post];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pre => "pre",
            Self::Process => "process",
            Self::Post => "post",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pre" => Ok(Self::Pre),
            "process" => Ok(Self::Process),
            "post" => Ok(Self::Post),
            other => Err(format!("unknown stage '{other}'")),
        }
    }
}

impl TryFrom<String> for Stage {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
