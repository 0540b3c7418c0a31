//! Request dispatch.
//!
//! [`invoke`] routes a target and operation to the handler of the matching
//! form. [`process_request`] wraps it for bindings: it consumes a
//! [`Request`], runs the handler over the request payload in place and
//! always produces a [`Response`], whatever the outcome.

use tracing::debug;

use servient_model::{OperationType, ResponseStatus, ServientError, ServientResult};

use crate::exchange::{Request, Response};
use crate::payload::Payload;
use crate::thing::Thing;

/// Run the handler of the form serving `target` for `op`.
///
/// Lookup failures ([`ServientError::NotFound`],
/// [`ServientError::NotAllowed`]) are returned as they are. A matching form
/// without a handler yields [`ServientError::NotImplemented`]. Otherwise the
/// handler's own result is returned.
pub fn invoke<'h, T>(
    thing: &T,
    target: &str,
    op: OperationType,
    payload: &mut Payload<'_>,
) -> ServientResult<()>
where
    T: Thing<'h> + ?Sized,
{
    debug!(href = target, operation = %op, "dispatching request");

    let form = thing.find(target, op.into())?;
    let Some(handler) = form.handler else {
        return Err(ServientError::NotImplemented);
    };
    handler.handle(target, op, payload, form.context)
}

/// Serve `request` and report the outcome as a [`Response`].
///
/// The response carries the request's payload segment. On success it holds
/// whatever the handler left there; on failure it is cleared so request
/// content is never echoed back.
pub fn process_request<'h, 'a, T>(thing: &T, request: Request<'a>) -> Response<'a>
where
    T: Thing<'h> + ?Sized,
{
    let Request {
        target,
        operation,
        mut payload,
    } = request;

    let status = match invoke(thing, target, operation, &mut payload) {
        Ok(()) => ResponseStatus::Ok,
        Err(err) => {
            debug!(href = target, operation = %operation, error = %err, "request failed");
            payload.clear();
            err.response_status()
        }
    };

    debug!(href = target, operation = %operation, status = %status, "request served");
    Response::new(status, payload)
}

/// [`invoke`] with [`OperationType::ReadProperty`].
pub fn read_property<'h, T>(
    thing: &T,
    target: &str,
    payload: &mut Payload<'_>,
) -> ServientResult<()>
where
    T: Thing<'h> + ?Sized,
{
    invoke(thing, target, OperationType::ReadProperty, payload)
}

/// [`invoke`] with [`OperationType::WriteProperty`].
pub fn write_property<'h, T>(
    thing: &T,
    target: &str,
    payload: &mut Payload<'_>,
) -> ServientResult<()>
where
    T: Thing<'h> + ?Sized,
{
    invoke(thing, target, OperationType::WriteProperty, payload)
}

/// [`invoke`] with [`OperationType::InvokeAction`].
pub fn invoke_action<'h, T>(
    thing: &T,
    target: &str,
    payload: &mut Payload<'_>,
) -> ServientResult<()>
where
    T: Thing<'h> + ?Sized,
{
    invoke(thing, target, OperationType::InvokeAction, payload)
}
