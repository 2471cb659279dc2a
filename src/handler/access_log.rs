//! Access logging of completed exchanges

use crate::error::BoxError;
use crate::http::ResponseWriter;
use crate::logger::{self, AccessLogEntry};
use crate::pipeline::{Handler, HandlerRegistration, Stage};
use async_trait::async_trait;
use hyper::Request;

/// POST-stage handler writing one access log line per request
pub struct AccessLogHandler {
    registration: HandlerRegistration,
    format: String,
}

impl AccessLogHandler {
    pub const NAME: &'static str = "access-log";

    /// `format` is `combined`, `common`, `json` or a custom `$variable` pattern
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            registration: HandlerRegistration::new(Self::NAME, Stage::Post),
            format: format.into(),
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

#[async_trait]
impl Handler for AccessLogHandler {
    fn registration(&self) -> &HandlerRegistration {
        &self.registration
    }

    async fn handle(
        &self,
        req: &Request<()>,
        res: &mut ResponseWriter,
    ) -> Result<bool, BoxError> {
        logger::log_access(&AccessLogEntry::from_exchange(req, res), &self.format);
        Ok(false)
    }
}
