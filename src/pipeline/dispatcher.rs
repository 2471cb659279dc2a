//! Staged request dispatcher
//!
//! Runs PRE handlers, then PROCESS handlers until one claims the request, then
//! POST handlers regardless of how the first two stages ended.

use std::collections::HashMap;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};

use super::{order, Handler, Stage};
use crate::error::Result;
use crate::http::{self, ResponseWriter};
use crate::logger;

/// Owns the handler table and the per-stage execution order
#[derive(Default)]
pub struct Dispatcher {
    /// Registration order; a re-registered name keeps its original slot
    handlers: Vec<Arc<dyn Handler>>,
    by_name: HashMap<String, usize>,
    ordered: HashMap<Stage, Vec<Arc<dyn Handler>>>,
    /// Registrations not yet reflected in `ordered`
    pending: bool,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any handler with the same name.
    ///
    /// Takes effect at the next `order_handlers` call.
    pub fn add_handler(&mut self, handler: Arc<dyn Handler>) -> Result<()> {
        let registration = handler.registration();
        registration.validate()?;
        let name = registration.name().to_string();

        if let Some(&slot) = self.by_name.get(&name) {
            logger::log_warning(&format!("Handler '{name}' registered twice, replacing"));
            self.handlers[slot] = handler;
        } else {
            self.by_name.insert(name, self.handlers.len());
            self.handlers.push(handler);
        }
        self.pending = true;
        Ok(())
    }

    /// Rebuild the per-stage execution order from the handler table.
    ///
    /// On error the previous order stays in effect.
    pub fn order_handlers(&mut self) -> Result<()> {
        let mut ordered = HashMap::with_capacity(Stage::ALL.len());
        for stage in Stage::ALL {
            let members: Vec<Arc<dyn Handler>> = self
                .handlers
                .iter()
                .filter(|h| h.registration().stage() == stage)
                .cloned()
                .collect();
            let sorted = order::sort(stage, members, |h| h.registration())?;
            ordered.insert(stage, sorted);
        }

        self.ordered = ordered;
        self.pending = false;
        for stage in Stage::ALL {
            logger::log_debug(&format!(
                "{stage} handlers: [{}]",
                self.handler_names(stage).join(", ")
            ));
        }
        Ok(())
    }

    /// False when handlers were added since the last `order_handlers`
    pub const fn is_ordered(&self) -> bool {
        !self.pending
    }

    /// Names of the handlers of `stage` in execution order
    pub fn handler_names(&self, stage: Stage) -> Vec<&str> {
        self.stage(stage)
            .iter()
            .map(|h| h.registration().name())
            .collect()
    }

    fn stage(&self, stage: Stage) -> &[Arc<dyn Handler>] {
        self.ordered.get(&stage).map_or(&[][..], Vec::as_slice)
    }

    /// Run the pipeline for one request against `res`
    pub async fn dispatch(&self, req: &Request<()>, res: &mut ResponseWriter) {
        for handler in self.stage(Stage::Pre) {
            if let Err(e) = handler.handle(req, res).await {
                logger::log_exception(&context(Stage::Pre, handler.as_ref()), &*e);
            }
        }

        self.process(req, res).await;

        for handler in self.stage(Stage::Post) {
            if let Err(e) = handler.handle(req, res).await {
                logger::log_exception(&context(Stage::Post, handler.as_ref()), &*e);
            }
        }
    }

    async fn process(&self, req: &Request<()>, res: &mut ResponseWriter) {
        for handler in self.stage(Stage::Process) {
            match handler.handle(req, res).await {
                Ok(true) => {
                    if res.is_writable() {
                        logger::log_warning(&format!(
                            "Handler '{}' claimed {} without responding",
                            handler.registration().name(),
                            req.uri().path()
                        ));
                    }
                    break;
                }
                Ok(false) => {}
                Err(e) => {
                    logger::log_exception(&context(Stage::Process, handler.as_ref()), &*e);
                    http::send_500_response(res);
                    return;
                }
            }
        }

        if http::send_404_response(res) {
            logger::log_debug(&format!("No handler for {} {}", req.method(), req.uri()));
        }
    }

    /// Dispatch a request and produce the hyper response
    pub async fn handle(&self, req: Request<()>) -> Response<Full<Bytes>> {
        let mut res = ResponseWriter::new();
        self.dispatch(&req, &mut res).await;
        res.into_response()
    }
}

fn context(stage: Stage, handler: &dyn Handler) -> String {
    format!("{stage} handler '{}' failed", handler.registration().name())
}
