//! Web of Things operation types and operation sets.
//!
//! Every operation type owns exactly one bit of an [`OperationSet`]. A form
//! declares the set of operations it accepts; a request names one operation,
//! which is checked against that set by inclusion.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// All operation types a form can be bound to.
///
/// The declaration order is the bit order used by [`OperationSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    // Property affordances
    /// Read the value of one property.
    ReadProperty,
    /// Write the value of one property.
    WriteProperty,
    /// Start observing one property.
    ObserveProperty,
    /// Stop observing one property.
    UnobserveProperty,

    // Action affordances
    /// Invoke an action.
    InvokeAction,
    /// Query the state of an ongoing action.
    QueryAction,
    /// Cancel an ongoing action.
    CancelAction,

    // Event affordances
    /// Subscribe to an event.
    SubscribeEvent,
    /// Unsubscribe from an event.
    UnsubscribeEvent,

    // Thing-level operations
    /// Read every property at once.
    ReadAllProperties,
    /// Write every writable property at once.
    WriteAllProperties,
    /// Read a selection of properties.
    ReadMultipleProperties,
    /// Write a selection of properties.
    WriteMultipleProperties,
    /// Observe every observable property.
    ObserveAllProperties,
    /// Stop observing every property.
    UnobserveAllProperties,
    /// Query every ongoing action.
    QueryAllActions,
    /// Subscribe to every event.
    SubscribeAllEvents,
    /// Unsubscribe from every event.
    UnsubscribeAllEvents,
}

/// The kind of interaction affordance an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffordanceKind {
    /// A property (state exposed for reading or writing).
    Property,
    /// An action (a function that can be invoked).
    Action,
    /// An event (a notification source).
    Event,
}

/// How many affordances one operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionScope {
    /// Exactly one affordance.
    Single,
    /// A caller-chosen selection of affordances.
    Multiple,
    /// Every affordance of the kind.
    All,
}

impl OperationType {
    /// Every operation type in bit order.
    pub const ALL: [Self; 18] = [
        Self::ReadProperty,
        Self::WriteProperty,
        Self::ObserveProperty,
        Self::UnobserveProperty,
        Self::InvokeAction,
        Self::QueryAction,
        Self::CancelAction,
        Self::SubscribeEvent,
        Self::UnsubscribeEvent,
        Self::ReadAllProperties,
        Self::WriteAllProperties,
        Self::ReadMultipleProperties,
        Self::WriteMultipleProperties,
        Self::ObserveAllProperties,
        Self::UnobserveAllProperties,
        Self::QueryAllActions,
        Self::SubscribeAllEvents,
        Self::UnsubscribeAllEvents,
    ];

    /// Returns the Thing Description name of the operation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadProperty => "readproperty",
            Self::WriteProperty => "writeproperty",
            Self::ObserveProperty => "observeproperty",
            Self::UnobserveProperty => "unobserveproperty",
            Self::InvokeAction => "invokeaction",
            Self::QueryAction => "queryaction",
            Self::CancelAction => "cancelaction",
            Self::SubscribeEvent => "subscribeevent",
            Self::UnsubscribeEvent => "unsubscribeevent",
            Self::ReadAllProperties => "readallproperties",
            Self::WriteAllProperties => "writeallproperties",
            Self::ReadMultipleProperties => "readmultipleproperties",
            Self::WriteMultipleProperties => "writemultipleproperties",
            Self::ObserveAllProperties => "observeallproperties",
            Self::UnobserveAllProperties => "unobserveallproperties",
            Self::QueryAllActions => "queryallactions",
            Self::SubscribeAllEvents => "subscribeallevents",
            Self::UnsubscribeAllEvents => "unsubscribeallevents",
        }
    }

    /// Parse a Thing Description operation name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.as_str() == name)
    }

    /// The single bit this operation occupies in an [`OperationSet`].
    #[must_use]
    pub const fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// A set holding only this operation.
    #[must_use]
    pub const fn into_set(self) -> OperationSet {
        OperationSet::single(self)
    }

    /// The affordance kind this operation addresses.
    #[must_use]
    pub fn affordance(self) -> AffordanceKind {
        match self {
            Self::ReadProperty
            | Self::WriteProperty
            | Self::ObserveProperty
            | Self::UnobserveProperty
            | Self::ReadAllProperties
            | Self::WriteAllProperties
            | Self::ReadMultipleProperties
            | Self::WriteMultipleProperties
            | Self::ObserveAllProperties
            | Self::UnobserveAllProperties => AffordanceKind::Property,
            Self::InvokeAction | Self::QueryAction | Self::CancelAction | Self::QueryAllActions => {
                AffordanceKind::Action
            }
            Self::SubscribeEvent
            | Self::UnsubscribeEvent
            | Self::SubscribeAllEvents
            | Self::UnsubscribeAllEvents => AffordanceKind::Event,
        }
    }

    /// How many affordances this operation addresses.
    #[must_use]
    pub fn scope(self) -> InteractionScope {
        match self {
            Self::ReadMultipleProperties | Self::WriteMultipleProperties => {
                InteractionScope::Multiple
            }
            Self::ReadAllProperties
            | Self::WriteAllProperties
            | Self::ObserveAllProperties
            | Self::UnobserveAllProperties
            | Self::QueryAllActions
            | Self::SubscribeAllEvents
            | Self::UnsubscribeAllEvents => InteractionScope::All,
            _ => InteractionScope::Single,
        }
    }

    /// Whether the operation carries no input payload.
    ///
    /// Writes and invocations consume the request payload; everything else
    /// only produces output.
    #[must_use]
    pub fn is_read_only(self) -> bool {
        !matches!(
            self,
            Self::WriteProperty
                | Self::WriteAllProperties
                | Self::WriteMultipleProperties
                | Self::InvokeAction
        )
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Operation sets
// ---------------------------------------------------------------------------

/// A set of operation types, one bit per [`OperationType`].
///
/// # Examples
///
/// ```
/// use servient_model::operations::{OperationSet, OperationType};
///
/// let allowed: OperationSet = OperationType::ReadProperty | OperationType::WriteProperty;
/// assert!(allowed.contains(OperationType::ReadProperty));
/// assert!(!allowed.contains(OperationType::InvokeAction));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationSet(u32);

impl OperationSet {
    /// The empty set. Doubles as the "unknown operation" sentinel.
    pub const EMPTY: Self = Self(0);

    /// Every defined operation.
    pub const ALL: Self = Self((1 << 18) - 1);

    /// Create a set from raw bits, dropping bits with no operation attached.
    #[must_use]
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Create a set holding exactly one operation.
    #[must_use]
    pub const fn single(op: OperationType) -> Self {
        Self(op.bit())
    }

    /// The raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether the set holds no operation.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether `op` is in the set.
    #[must_use]
    pub const fn contains(self, op: OperationType) -> bool {
        self.0 & op.bit() != 0
    }

    /// Whether every operation of `other` is in the set.
    #[must_use]
    pub const fn contains_all(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether the two sets share at least one operation.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Union of two sets, usable in constant declarations.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Number of operations in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the operations in bit order.
    pub fn iter(self) -> impl Iterator<Item = OperationType> {
        OperationType::ALL
            .into_iter()
            .filter(move |op| self.contains(*op))
    }
}

impl fmt::Debug for OperationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for OperationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for op in self.iter() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(op.as_str())?;
            first = false;
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

impl From<OperationType> for OperationSet {
    fn from(op: OperationType) -> Self {
        Self::single(op)
    }
}

impl FromIterator<OperationType> for OperationSet {
    fn from_iter<I: IntoIterator<Item = OperationType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, |set, op| set | op)
    }
}

impl BitOr for OperationSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOr<OperationType> for OperationSet {
    type Output = Self;

    fn bitor(self, rhs: OperationType) -> Self {
        Self(self.0 | rhs.bit())
    }
}

impl BitOr for OperationType {
    type Output = OperationSet;

    fn bitor(self, rhs: Self) -> OperationSet {
        OperationSet(self.bit() | rhs.bit())
    }
}

impl BitOrAssign<OperationType> for OperationSet {
    fn bitor_assign(&mut self, rhs: OperationType) {
        self.0 |= rhs.bit();
    }
}

impl BitAnd for OperationSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
