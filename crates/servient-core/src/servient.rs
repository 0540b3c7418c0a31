//! The request loop tying a [`ProtocolBinding`] to a [`Thing`].
//!
//! Each turn decodes one request into the caller's scratch memory, serves it
//! and sends the response back through the same binding. No memory outlives
//! a turn, so one scratch buffer serves every request.

use tracing::{debug, info, warn};

use servient_model::{ErrorKind, ResponseStatus, ServientResult};

use crate::binding::ProtocolBinding;
use crate::dispatch::process_request;
use crate::exchange::Response;
use crate::payload::Payload;
use crate::thing::Thing;

/// A Thing exposed through a protocol binding.
#[derive(Debug)]
pub struct Servient<T, B> {
    thing: T,
    binding: B,
}

impl<T, B: ProtocolBinding> Servient<T, B> {
    /// Expose `thing` through `binding`.
    #[must_use]
    pub fn new(thing: T, binding: B) -> Self {
        Self { thing, binding }
    }

    /// The served registry.
    #[must_use]
    pub fn thing(&self) -> &T {
        &self.thing
    }

    /// Mutable access to the served registry, e.g. to register forms
    /// between requests.
    pub fn thing_mut(&mut self) -> &mut T {
        &mut self.thing
    }

    /// The protocol binding.
    #[must_use]
    pub fn binding(&self) -> &B {
        &self.binding
    }

    /// Split back into registry and binding.
    #[must_use]
    pub fn into_parts(self) -> (T, B) {
        (self.thing, self.binding)
    }

    /// Serve a single request using `scratch` as request and response
    /// memory.
    ///
    /// Returns the status sent to the peer, or `None` once the binding has
    /// no more requests. Requests the binding cannot decode are answered
    /// with the status of the decoding error. Transport failures end the
    /// loop with an error.
    pub fn run_once<'h>(&mut self, scratch: &mut [u8]) -> ServientResult<Option<ResponseStatus>>
    where
        T: Thing<'h>,
    {
        let request = match self.binding.receive(Payload::writable(scratch)) {
            Ok(Some(request)) => request,
            Ok(None) => return Ok(None),
            Err(err) if err.kind() == ErrorKind::Generic => return Err(err),
            Err(err) => {
                warn!(error = %err, "rejected undecodable request");
                let status = err.response_status();
                self.binding.send(&Response::empty(status))?;
                return Ok(Some(status));
            }
        };

        let response = process_request(&self.thing, request);
        let status = response.status;
        self.binding.send(&response)?;
        Ok(Some(status))
    }

    /// Serve requests until the binding runs dry. Returns how many requests
    /// were answered.
    pub fn run<'h>(&mut self, scratch: &mut [u8]) -> ServientResult<usize>
    where
        T: Thing<'h>,
    {
        info!(scratch_bytes = scratch.len(), "servient loop started");
        let mut served = 0;
        while let Some(status) = self.run_once(scratch)? {
            served += 1;
            debug!(status = %status, served, "response sent");
        }
        info!(served, "servient loop finished");
        Ok(served)
    }
}
