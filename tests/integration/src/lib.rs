//! Integration tests for servient.
//!
//! The tests drive complete servients in-process: forms are registered,
//! requests are fed through the line binding from memory and the encoded
//! responses are compared byte for byte.
//!
//! Run them with:
//! ```text
//! cargo test -p servient-integration
//! ```

use std::any::Any;
use std::cell::Cell;
use std::io::Cursor;
use std::sync::Once;

use servient_core::form::context_as;
use servient_core::{LineBinding, Payload, Servient, StreamIo, Thing};
use servient_model::{ContentFormat, OperationSet, OperationType, ServientError, ServientResult};

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// In-memory transport: input is preloaded, output is collected.
pub type MemoryIo = StreamIo<Cursor<Vec<u8>>, Vec<u8>>;

/// Operations of a read-write property.
pub const READ_WRITE: OperationSet = OperationType::ReadProperty
    .into_set()
    .union(OperationType::WriteProperty.into_set());

/// A line binding reading `input` from memory.
#[must_use]
pub fn memory_binding(input: &str, target_buffer_bytes: usize) -> LineBinding<MemoryIo> {
    let io = StreamIo::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    LineBinding::with_target_buffer(io, target_buffer_bytes)
}

/// Serve every line of `input` with `thing` and return the encoded responses.
pub fn serve_lines<'h, T>(thing: T, input: &str, scratch_bytes: usize) -> String
where
    T: Thing<'h>,
{
    init_tracing();

    let mut servient = Servient::new(thing, memory_binding(input, 32));
    let mut scratch = vec![0u8; scratch_bytes];
    servient
        .run(&mut scratch)
        .unwrap_or_else(|e| panic!("servient loop failed: {e}"));

    let (_, binding) = servient.into_parts();
    let (_, written) = binding.into_io().into_inner();
    String::from_utf8(written).unwrap_or_else(|e| panic!("response is not UTF-8: {e}"))
}

/// Handler of a boolean property kept in a `Cell<bool>` context.
pub fn bool_property(
    _target: &str,
    op: OperationType,
    payload: &mut Payload<'_>,
    context: Option<&dyn Any>,
) -> ServientResult<()> {
    let value = context_as::<Cell<bool>>(context)?;
    match op {
        OperationType::ReadProperty => {
            payload.clear();
            serde_json::to_writer(&mut *payload, &value.get())
                .map_err(|e| ServientError::generic(e.to_string()))?;
            payload.set_content_format(ContentFormat::JSON);
            Ok(())
        }
        OperationType::WriteProperty => {
            let parsed: bool = serde_json::from_slice(payload.as_bytes())
                .map_err(|e| ServientError::generic(e.to_string()))?;
            value.set(parsed);
            payload.clear();
            Ok(())
        }
        _ => Err(ServientError::NotAllowed),
    }
}

/// Handler answering with a fixed text.
pub fn greeting(
    _target: &str,
    _op: OperationType,
    payload: &mut Payload<'_>,
    _context: Option<&dyn Any>,
) -> ServientResult<()> {
    payload.clear();
    payload.append_text("hello")
}

mod test_dispatch;
mod test_payload;
mod test_registry;
mod test_servient;
