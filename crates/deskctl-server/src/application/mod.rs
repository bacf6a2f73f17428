//! Application layer for deskctl-server.
//!
//! # Components
//!
//! - **`driver`** - The `InputDriver` trait every handler calls.  The
//!   implementation (headless display, recording mock) is injected at
//!   construction time by the infrastructure layer.
//!
//! - **`handlers`** - One `ActionHandler` per action.  Each validates its own
//!   parameters and returns a JSON result or a `HandlerError`.
//!
//! - **`registry`** - Name → handler mapping built from a `HandlerCatalog`,
//!   with atomic reload.
//!
//! - **`dispatcher`** - The per-message pipeline: decode, authenticate,
//!   route, invoke, and wrap the outcome in a response envelope.

pub mod dispatcher;
pub mod driver;
pub mod handlers;
pub mod registry;

pub use dispatcher::Dispatcher;
pub use driver::{DriverError, Frame, InputDriver};
pub use handlers::{ActionHandler, HandlerContext, HandlerError};
pub use registry::{ActionRegistry, BuiltinCatalog, HandlerCatalog, RegistryError};
