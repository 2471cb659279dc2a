//! Handler capability and registration metadata

use super::Stage;
use crate::error::{BoxError, Error, Result};
use crate::http::ResponseWriter;
use async_trait::async_trait;
use hyper::Request;
use serde::Deserialize;

/// Metadata describing one pipeline handler
///
/// `before`/`after` name other handlers of the same stage. Names that are not
/// registered are ignored when ordering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HandlerRegistration {
    name: String,
    stage: Stage,
    #[serde(default)]
    before: Vec<String>,
    #[serde(default)]
    after: Vec<String>,
}

impl HandlerRegistration {
    pub fn new(name: impl Into<String>, stage: Stage) -> Self {
        Self {
            name: name.into(),
            stage,
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// This handler must run before each of `names`
    #[must_use]
    pub fn before<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.before.extend(names.into_iter().map(Into::into));
        self
    }

    /// This handler must run after each of `names`
    #[must_use]
    pub fn after<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.after.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn stage(&self) -> Stage {
        self.stage
    }

    pub fn runs_before(&self) -> &[String] {
        &self.before
    }

    pub fn runs_after(&self) -> &[String] {
        &self.after
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidRegistration(
                "handler name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// A pipeline handler
///
/// The return value of `handle` only matters in the PROCESS stage, where `true`
/// claims the request and stops the stage. An `Err` is logged; in PROCESS it
/// also turns into a 500 response.
#[async_trait]
pub trait Handler: Send + Sync {
    fn registration(&self) -> &HandlerRegistration;

    async fn handle(
        &self,
        req: &Request<()>,
        res: &mut ResponseWriter,
    ) -> std::result::Result<bool, BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_constraints() {
        let reg = HandlerRegistration::new("auth", Stage::Pre)
            .after(["request-log"])
            .before(vec!["session".to_string(), "csrf".to_string()]);
        assert_eq!(reg.name(), "auth");
        assert_eq!(reg.stage(), Stage::Pre);
        assert_eq!(reg.runs_after(), ["request-log"]);
        assert_eq!(reg.runs_before(), ["session", "csrf"]);
    }

    #[test]
    fn test_empty_name_rejected() {
        let reg = HandlerRegistration::new("  ", Stage::Post);
        assert!(matches!(reg.validate(), Err(Error::InvalidRegistration(_))));
    }

    #[test]
    fn test_deserialize_from_toml() {
        let reg: HandlerRegistration = toml::from_str(
            r#"
            name = "static"
            stage = "process"
            after = ["api"]
            "#,
        )
        .unwrap();
        assert_eq!(reg.stage(), Stage::Process);
        assert_eq!(reg.runs_after(), ["api"]);
        assert!(reg.runs_before().is_empty());
    }
}
