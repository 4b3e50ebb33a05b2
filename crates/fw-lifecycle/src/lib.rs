//! fw-lifecycle - Deployment lifecycle adapter for Forwardly
//!
//! Converts one deployment lifecycle event (create, update or delete) into a
//! single migration pass and reports the outcome in the response envelope the
//! deployment system expects. Errors never escape [`LifecycleHandler::handle`];
//! they come back as `FAILED` responses.

pub mod error;
pub mod event;
pub mod handler;
pub mod response;

pub use error::{LifecycleError, LifecycleResult};
pub use event::{LifecycleEvent, RequestType};
pub use handler::LifecycleHandler;
pub use response::{LifecycleResponse, ResponseData, ResponseStatus};
