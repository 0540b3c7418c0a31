//! Request dispatch for Web of Things servients on constrained devices.
//!
//! A servient exposes a Thing: a registry of forms, each binding a target
//! and a set of operations to a handler. Requests arrive through a protocol
//! binding, are routed to the matching form and answered in place, inside
//! memory the application hands in. Nothing here allocates.
//!
//! # Architecture
//!
//! ```text
//!   PlatformIo (bytes in / bytes out)
//!        |
//!        v
//!   ProtocolBinding (LineBinding, ...)
//!        |  Request { target, operation, payload }
//!        v
//!   process_request ---> Thing::find ---> Form handler
//!        |  Response { status, payload }
//!        v
//!   ProtocolBinding::send
//! ```
//!
//! [`Servient`] runs that loop over one scratch buffer, which [`Payload`]
//! segments split between the target and the payload of each request.

pub mod binding;
pub mod config;
pub mod dispatch;
pub mod exchange;
pub mod form;
pub mod line;
pub mod payload;
pub mod servient;
pub mod thing;

pub use binding::{PlatformIo, ProtocolBinding, StreamIo};
pub use config::ServientConfig;
pub use dispatch::{invoke, invoke_action, process_request, read_property, write_property};
pub use exchange::{Request, Response};
pub use form::{Form, Handler};
pub use line::LineBinding;
pub use payload::{Access, Payload, PayloadSource};
pub use servient::Servient;
pub use thing::{DynamicThing, Lookup, Placement, SearchOrder, StaticThing, Thing};
