//! Request and response descriptors passed between a binding and the
//! dispatch engine.

use servient_model::{OperationType, ResponseStatus};

use crate::payload::Payload;

/// A request as decoded by a protocol binding.
///
/// `target` usually borrows from the same scratch memory as `payload`.
#[derive(Debug)]
pub struct Request<'a> {
    /// Target the request is routed by.
    pub target: &'a str,
    /// Requested operation.
    pub operation: OperationType,
    /// Request content. Reused as the response content.
    pub payload: Payload<'a>,
}

impl<'a> Request<'a> {
    /// Create a request.
    #[must_use]
    pub fn new(target: &'a str, operation: OperationType, payload: Payload<'a>) -> Self {
        Self {
            target,
            operation,
            payload,
        }
    }
}

/// A response ready to be serialized by a protocol binding.
#[derive(Debug)]
pub struct Response<'a> {
    /// Outcome of the request.
    pub status: ResponseStatus,
    /// Response content; the request payload's memory, reused in place.
    pub payload: Payload<'a>,
}

impl<'a> Response<'a> {
    /// Create a response.
    #[must_use]
    pub fn new(status: ResponseStatus, payload: Payload<'a>) -> Self {
        Self { status, payload }
    }

    /// A response with no content.
    #[must_use]
    pub fn empty(status: ResponseStatus) -> Self {
        Self::new(status, Payload::new())
    }
}
