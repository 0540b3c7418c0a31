//! Compact one-byte operation encoding for constrained bindings.
//!
//! Layout of a packed operation byte:
//!
//! ```text
//!   7 6   5 4   3 2 1 0
//!  +---+ +---+ +-------+
//!  |n n| |v v| |y x w r|
//!  +---+ +---+ +-------+
//!   |     |     verb: r=read/query, w=write, x=invoke/observe/subscribe,
//!   |     |           y=cancel/unobserve/unsubscribe
//!   |     affordance: 01 property, 10 action, 11 event
//!   scope: 01 single, 10 multiple, 11 all
//! ```
//!
//! The layout is confined to this module; the rest of the workspace works
//! with [`OperationType`] and its classification methods.

use crate::operations::{AffordanceKind, InteractionScope, OperationType};

const SCOPE_SINGLE: u8 = 0b01 << 6;
const SCOPE_MULTIPLE: u8 = 0b10 << 6;
const SCOPE_ALL: u8 = 0b11 << 6;

const KIND_PROPERTY: u8 = 0b01 << 4;
const KIND_ACTION: u8 = 0b10 << 4;
const KIND_EVENT: u8 = 0b11 << 4;

const VERB_R: u8 = 1;
const VERB_W: u8 = 1 << 1;
const VERB_X: u8 = 1 << 2;
const VERB_Y: u8 = 1 << 3;

/// Encode an operation into its packed byte.
#[must_use]
pub fn to_packed(op: OperationType) -> u8 {
    let scope = match op.scope() {
        InteractionScope::Single => SCOPE_SINGLE,
        InteractionScope::Multiple => SCOPE_MULTIPLE,
        InteractionScope::All => SCOPE_ALL,
    };
    let kind = match op.affordance() {
        AffordanceKind::Property => KIND_PROPERTY,
        AffordanceKind::Action => KIND_ACTION,
        AffordanceKind::Event => KIND_EVENT,
    };
    scope | kind | verb(op)
}

/// Decode a packed byte. Bytes that name no operation yield `None`.
#[must_use]
pub fn from_packed(byte: u8) -> Option<OperationType> {
    OperationType::ALL
        .into_iter()
        .find(|op| to_packed(*op) == byte)
}

fn verb(op: OperationType) -> u8 {
    use OperationType as Op;

    match op {
        Op::ReadProperty
        | Op::ReadAllProperties
        | Op::ReadMultipleProperties
        | Op::QueryAction
        | Op::QueryAllActions => VERB_R,
        Op::WriteProperty | Op::WriteAllProperties | Op::WriteMultipleProperties => VERB_W,
        Op::ObserveProperty
        | Op::ObserveAllProperties
        | Op::InvokeAction
        | Op::SubscribeEvent
        | Op::SubscribeAllEvents => VERB_X,
        Op::UnobserveProperty
        | Op::UnobserveAllProperties
        | Op::CancelAction
        | Op::UnsubscribeEvent
        | Op::UnsubscribeAllEvents => VERB_Y,
    }
}
