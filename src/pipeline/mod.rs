//! Request pipeline
//!
//! Handlers declare a stage and optional ordering constraints; the dispatcher
//! orders them once at startup and runs them for every request.

mod dispatcher;
mod handler;
pub mod order;
mod stage;

pub use dispatcher::Dispatcher;
pub use handler::{Handler, HandlerRegistration};
pub use order::sort;
pub use stage::Stage;
