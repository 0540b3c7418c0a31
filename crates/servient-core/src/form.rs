//! Endpoint records ("forms") and the handler contract.

use std::any::Any;
use std::fmt;

use servient_model::{OperationSet, OperationType, ServientError, ServientResult};

use crate::payload::Payload;

/// Behavior bound to a form.
///
/// The handler receives the request target, the requested operation, the
/// request payload (which it may overwrite with the response content) and
/// the form's context. It must not keep the payload past the call and must
/// respect its capacity.
///
/// Any function or closure with the matching signature is a handler:
///
/// ```
/// use std::any::Any;
///
/// use servient_core::form::{Form, Handler};
/// use servient_core::payload::Payload;
/// use servient_model::{OperationType, ServientResult};
///
/// fn read_name(
///     _target: &str,
///     _op: OperationType,
///     payload: &mut Payload<'_>,
///     _context: Option<&dyn Any>,
/// ) -> ServientResult<()> {
///     payload.overwrite(b"lamp")
/// }
///
/// const NAME: Form<'static> =
///     Form::new("/name", OperationType::ReadProperty.into_set()).with_handler(&read_name);
/// # let _ = NAME;
/// ```
pub trait Handler {
    /// Serve one request.
    fn handle(
        &self,
        target: &str,
        op: OperationType,
        payload: &mut Payload<'_>,
        context: Option<&dyn Any>,
    ) -> ServientResult<()>;
}

impl<F> Handler for F
where
    F: Fn(&str, OperationType, &mut Payload<'_>, Option<&dyn Any>) -> ServientResult<()>,
{
    fn handle(
        &self,
        target: &str,
        op: OperationType,
        payload: &mut Payload<'_>,
        context: Option<&dyn Any>,
    ) -> ServientResult<()> {
        self(target, op, payload, context)
    }
}

/// A registered endpoint: which target it serves, which operations it
/// accepts, and what runs when it matches.
///
/// A form without a handler is a deliberately declared endpoint that is not
/// implemented yet; dispatching to it reports
/// [`ServientError::NotImplemented`].
#[derive(Clone, Copy)]
pub struct Form<'h> {
    /// Target the form is routed by, compared as a whole string.
    pub target: &'h str,
    /// Operations the form accepts. Never empty for a registered form.
    pub allowed: OperationSet,
    /// Behavior to run, if any.
    pub handler: Option<&'h dyn Handler>,
    /// Opaque value handed to the handler on every call.
    pub context: Option<&'h dyn Any>,
}

impl<'h> Form<'h> {
    /// Placeholder used to pre-fill registry slots.
    pub const VACANT: Form<'static> = Form::new("", OperationSet::EMPTY);

    /// A form with no handler and no context.
    #[must_use]
    pub const fn new(target: &'h str, allowed: OperationSet) -> Self {
        Self {
            target,
            allowed,
            handler: None,
            context: None,
        }
    }

    /// Attach a handler.
    #[must_use]
    pub const fn with_handler(mut self, handler: &'h dyn Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Attach a context value.
    #[must_use]
    pub const fn with_context(mut self, context: &'h dyn Any) -> Self {
        self.context = Some(context);
        self
    }

    /// Whether the form accepts every operation in `mask`. An empty mask is
    /// never accepted.
    #[must_use]
    pub const fn accepts(&self, mask: OperationSet) -> bool {
        !mask.is_empty() && self.allowed.contains_all(mask)
    }
}

impl fmt::Debug for Form<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("target", &self.target)
            .field("allowed", &self.allowed)
            .field("has_handler", &self.handler.is_some())
            .field("has_context", &self.context.is_some())
            .finish()
    }
}

/// Borrow the form context as a `T`.
///
/// Fails with a generic error when the form carries no context or one of a
/// different type.
pub fn context_as<T: Any>(context: Option<&dyn Any>) -> ServientResult<&T> {
    context
        .and_then(|ctx| ctx.downcast_ref::<T>())
        .ok_or_else(|| ServientError::generic("form context missing or of unexpected type"))
}
