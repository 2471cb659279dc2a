//! Incoming request logging

use crate::error::BoxError;
use crate::http::ResponseWriter;
use crate::logger;
use crate::pipeline::{Handler, HandlerRegistration, Stage};
use async_trait::async_trait;
use hyper::Request;

/// PRE-stage handler logging `METHOD URI` at debug level
pub struct RequestLogHandler {
    registration: HandlerRegistration,
}

impl RequestLogHandler {
    pub const NAME: &'static str = "request-log";

    pub fn new() -> Self {
        Self {
            registration: HandlerRegistration::new(Self::NAME, Stage::Pre),
        }
    }
}

impl Default for RequestLogHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Handler for RequestLogHandler {
    fn registration(&self) -> &HandlerRegistration {
        &self.registration
    }

    async fn handle(
        &self,
        req: &Request<()>,
        _res: &mut ResponseWriter,
    ) -> Result<bool, BoxError> {
        logger::log_debug(&format!("{} {}", req.method(), req.uri()));
        Ok(false)
    }
}
