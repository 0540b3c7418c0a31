//! Shared types for the servient request-dispatch runtime.
//!
//! This crate holds the vocabulary every other layer speaks: the Web of
//! Things operation types and their bit sets, the compact packed encoding
//! used by constrained bindings, content-format tags, response statuses and
//! the error taxonomy with its status mapping. It has no behavior of its own.

pub mod content_format;
pub mod error;
pub mod operations;
pub mod packed;
pub mod status;

pub use content_format::ContentFormat;
pub use error::{ErrorKind, ServientError, ServientResult};
pub use operations::{AffordanceKind, InteractionScope, OperationSet, OperationType};
pub use status::ResponseStatus;
