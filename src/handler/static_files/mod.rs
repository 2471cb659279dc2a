//! Static file serving module
//!
//! Serves files from configured sources (root directory + URL prefix), with an
//! optional per-source allow-list and directory index fallback.

mod delivery;
mod fallback;
mod registry;
mod resolver;
mod source;

pub use delivery::{serve, Delivery};
pub use registry::{SourceMatch, SourceRegistry};
pub use resolver::{resolve, DenyReason, Resolution};
pub use source::{SourceConfig, SourceDto, ALLOW_ALL, DEFAULT_FILES};

use crate::error::{BoxError, Result};
use crate::http::ResponseWriter;
use crate::logger;
use crate::pipeline::{Handler, HandlerRegistration, Stage};
use async_trait::async_trait;
use hyper::{Method, Request};

/// PROCESS-stage handler serving files from a `SourceRegistry`
pub struct StaticHandler {
    registration: HandlerRegistration,
    registry: SourceRegistry,
}

impl StaticHandler {
    pub const NAME: &'static str = "static";

    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            registration: HandlerRegistration::new(Self::NAME, Stage::Process),
            registry,
        }
    }

    pub fn from_sources(sources: &[SourceDto]) -> Result<Self> {
        Ok(Self::new(SourceRegistry::from_dtos(sources)?))
    }

    pub const fn registry(&self) -> &SourceRegistry {
        &self.registry
    }
}

#[async_trait]
impl Handler for StaticHandler {
    fn registration(&self) -> &HandlerRegistration {
        &self.registration
    }

    async fn handle(
        &self,
        req: &Request<()>,
        res: &mut ResponseWriter,
    ) -> std::result::Result<bool, BoxError> {
        if !res.is_writable() {
            return Ok(false);
        }
        if req.method() != Method::GET && req.method() != Method::HEAD {
            return Ok(false);
        }

        // Undecodable paths cannot name a file
        let Ok(path) = urlencoding::decode(req.uri().path()) else {
            return Ok(false);
        };
        let Some(hit) = self.registry.find(&path) else {
            return Ok(false);
        };

        match serve(hit.config, hit.rel, req, res).await {
            Delivery::Served => Ok(true),
            Delivery::NotServed => Ok(false),
            Delivery::Denied(reason) => {
                logger::log_warning(&format!(
                    "Blocked static request {} ({reason})",
                    req.uri().path()
                ));
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;
    use std::fs;

    fn handler(root: &std::path::Path, prefix: &str) -> StaticHandler {
        StaticHandler::from_sources(&[SourceDto::new(root.to_string_lossy(), prefix)]).unwrap()
    }

    #[tokio::test]
    async fn test_serves_under_prefix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("style.css"), "body{}").unwrap();
        let h = handler(dir.path(), "/assets");

        let req = Request::get("/assets/style.css").body(()).unwrap();
        let mut res = ResponseWriter::new();
        assert!(h.handle(&req, &mut res).await.unwrap());
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.body(), b"body{}");
    }

    #[tokio::test]
    async fn test_decodes_percent_escapes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hello world.txt"), "hi").unwrap();
        let h = handler(dir.path(), "/");

        let req = Request::get("/hello%20world.txt?v=1").body(()).unwrap();
        let mut res = ResponseWriter::new();
        assert!(h.handle(&req, &mut res).await.unwrap());
        assert_eq!(res.body(), b"hi");
    }

    #[tokio::test]
    async fn test_encoded_traversal_not_handled() {
        let dir = tempfile::tempdir().unwrap();
        let h = handler(&dir.path().join("public"), "/");

        let req = Request::get("/%2e%2e/secret.txt").body(()).unwrap();
        let mut res = ResponseWriter::new();
        assert!(!h.handle(&req, &mut res).await.unwrap());
        assert!(res.is_writable());
    }

    #[tokio::test]
    async fn test_other_methods_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let h = handler(dir.path(), "/");

        let req = Request::post("/a.txt").body(()).unwrap();
        let mut res = ResponseWriter::new();
        assert!(!h.handle(&req, &mut res).await.unwrap());
        assert!(res.is_writable());
    }

    #[tokio::test]
    async fn test_skips_when_response_already_started() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let h = handler(dir.path(), "/");

        let req = Request::get("/a.txt").body(()).unwrap();
        let mut res = ResponseWriter::new();
        crate::http::send_404_response(&mut res);
        assert!(!h.handle(&req, &mut res).await.unwrap());
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unmatched_prefix_not_handled() {
        let dir = tempfile::tempdir().unwrap();
        let h = handler(dir.path(), "/assets");

        let req = Request::get("/other/a.txt").body(()).unwrap();
        let mut res = ResponseWriter::new();
        assert!(!h.handle(&req, &mut res).await.unwrap());
    }

    #[test]
    fn test_registration_is_process_stage() {
        let h = StaticHandler::new(SourceRegistry::new());
        assert_eq!(h.registration().name(), "static");
        assert_eq!(h.registration().stage(), Stage::Process);
        assert!(h.registry().is_empty());
    }
}
