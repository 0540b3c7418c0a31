//! servient-demo - a lamp exposed as a Web of Things servient.
//!
//! Requests are read line by line from standard input and answered on
//! standard output; logs go to standard error.
//!
//! # Usage
//!
//! ```text
//! printf 'readproperty /status\ninvokeaction /toggle\n' | servient-demo
//! 0 OK false
//! 0 OK true
//! ```
//!
//! # Affordances
//!
//! | Target | Operations | Content |
//! |--------|------------|---------|
//! | `/name` | `readproperty` | text |
//! | `/status` | `readproperty`, `writeproperty` | JSON boolean |
//! | `/toggle` | `invokeaction` | JSON boolean, the new status |
//! | `/toggles` | `readproperty` | JSON number |
//! | `/oh` | `subscribeevent` | not implemented |
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SERVIENT_SCRATCH_BUFFER_BYTES` | `512` | Memory each request is decoded into |
//! | `SERVIENT_TARGET_BUFFER_BYTES` | `32` | Part of it reserved for the target |
//! | `SERVIENT_FORMS_BUFFER_BYTES` | `1024` | Memory for the form registry |
//! | `SERVIENT_NEWEST_FIRST` | `false` | Let the newest form win lookups |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::any::Any;
use std::cell::Cell;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use servient_core::form::{Form, context_as};
use servient_core::{DynamicThing, LineBinding, Payload, Servient, ServientConfig, StreamIo, Thing};
use servient_model::{ContentFormat, OperationSet, OperationType, ServientError, ServientResult};

/// Version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

const STATUS_OPS: OperationSet = OperationType::ReadProperty
    .into_set()
    .union(OperationType::WriteProperty.into_set());

/// Forms that need no state.
const INFO_FORMS: &[Form<'static>] = &[
    Form::new("/name", OperationType::ReadProperty.into_set()).with_handler(&read_name),
    Form::new("/oh", OperationType::SubscribeEvent.into_set()),
];

/// State shared by the lamp handlers.
#[derive(Debug, Default)]
struct Lamp {
    on: Cell<bool>,
    toggles: Cell<u32>,
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Standard output carries responses, so logs are written to standard error.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn write_json<T: Serialize>(payload: &mut Payload<'_>, value: &T) -> ServientResult<()> {
    payload.clear();
    serde_json::to_writer(&mut *payload, value)
        .map_err(|err| ServientError::generic(err.to_string()))?;
    payload.set_content_format(ContentFormat::JSON);
    Ok(())
}

fn read_name(
    _target: &str,
    _op: OperationType,
    payload: &mut Payload<'_>,
    _context: Option<&dyn Any>,
) -> ServientResult<()> {
    payload.clear();
    payload.append_text("servient-demo lamp")?;
    payload.set_content_format(ContentFormat::TEXT_PLAIN);
    Ok(())
}

fn status(
    _target: &str,
    op: OperationType,
    payload: &mut Payload<'_>,
    context: Option<&dyn Any>,
) -> ServientResult<()> {
    let lamp = context_as::<Lamp>(context)?;
    match op {
        OperationType::ReadProperty => write_json(payload, &lamp.on.get()),
        OperationType::WriteProperty => {
            let on: bool = serde_json::from_slice(payload.as_bytes())
                .map_err(|err| ServientError::generic(format!("invalid status: {err}")))?;
            lamp.on.set(on);
            payload.clear();
            Ok(())
        }
        _ => Err(ServientError::NotAllowed),
    }
}

fn toggle(
    _target: &str,
    _op: OperationType,
    payload: &mut Payload<'_>,
    context: Option<&dyn Any>,
) -> ServientResult<()> {
    let lamp = context_as::<Lamp>(context)?;
    lamp.on.set(!lamp.on.get());
    lamp.toggles.set(lamp.toggles.get().saturating_add(1));
    write_json(payload, &lamp.on.get())
}

fn toggles(
    _target: &str,
    _op: OperationType,
    payload: &mut Payload<'_>,
    context: Option<&dyn Any>,
) -> ServientResult<()> {
    let lamp = context_as::<Lamp>(context)?;
    write_json(payload, &lamp.toggles.get())
}

/// Register the forms bound to `lamp`.
fn register_lamp<'h, T>(thing: &mut T, lamp: &'h Lamp) -> ServientResult<()>
where
    T: Thing<'h> + ?Sized,
{
    let forms = [
        Form::new("/status", STATUS_OPS).with_handler(&status),
        Form::new("/toggle", OperationType::InvokeAction.into_set()).with_handler(&toggle),
        Form::new("/toggles", OperationType::ReadProperty.into_set()).with_handler(&toggles),
    ];
    for form in forms {
        thing.insert_or_replace(form.with_context(lamp))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let config = ServientConfig::from_env();
    init_tracing(&config.log_level)?;
    config.validate().context("invalid servient configuration")?;

    info!(
        version = VERSION,
        scratch_bytes = config.scratch_buffer_bytes,
        target_bytes = config.target_buffer_bytes,
        forms_capacity = config.forms_capacity(),
        search_order = ?config.search_order(),
        "starting servient-demo"
    );

    let lamp = Lamp::default();
    let mut slots = vec![Form::VACANT; config.forms_capacity()];
    let mut thing = DynamicThing::from_forms(&mut slots, INFO_FORMS, config.lookup())
        .context("form buffer too small for the built-in forms")?;
    register_lamp(&mut thing, &lamp).context("failed to register lamp forms")?;
    info!(forms = thing.len(), "forms registered");

    let io = StreamIo::new(std::io::stdin().lock(), std::io::stdout().lock());
    let binding = LineBinding::with_target_buffer(io, config.target_buffer_bytes);
    let mut servient = Servient::new(thing, binding);

    let mut scratch = vec![0u8; config.scratch_buffer_bytes];
    let served = servient.run(&mut scratch).context("servient loop failed")?;

    info!(served, toggles = lamp.toggles.get(), "input exhausted, shutting down");
    Ok(())
}
