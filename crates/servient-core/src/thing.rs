//! Form registries ("Things").
//!
//! A Thing is an ordered sequence of [`Form`]s looked up by target and
//! operation. Two registries implement the [`Thing`] trait:
//!
//! - [`StaticThing`] borrows a form table that is fixed for its lifetime,
//!   typically a `const` declared by the application. It rejects every
//!   mutation.
//! - [`DynamicThing`] manages a caller-supplied slot array. It starts empty
//!   and can grow up to the number of slots, never past it.
//!
//! How targets are compared and in which order forms are scanned is injected
//! through [`Lookup`].

use std::cmp::Ordering;
use std::mem;

use serde::{Deserialize, Serialize};
use tracing::debug;

use servient_model::{OperationSet, ServientError, ServientResult};

use crate::form::Form;

// ---------------------------------------------------------------------------
// Lookup capability
// ---------------------------------------------------------------------------

/// Target comparison function. `Ordering::Equal` means the targets match.
pub type TargetCompare = fn(&str, &str) -> Ordering;

/// Order in which forms are scanned during lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchOrder {
    /// First registered form wins.
    #[default]
    OldestFirst,
    /// Last registered form wins.
    NewestFirst,
}

/// Lookup behavior shared by every registry.
#[derive(Debug, Clone, Copy)]
pub struct Lookup {
    /// How targets are compared.
    pub compare: TargetCompare,
    /// How forms are scanned.
    pub order: SearchOrder,
}

impl Lookup {
    /// Byte-wise comparison, oldest form first.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            compare: compare_bytes,
            order: SearchOrder::OldestFirst,
        }
    }

    /// Replace the target comparison.
    #[must_use]
    pub const fn with_compare(mut self, compare: TargetCompare) -> Self {
        self.compare = compare;
        self
    }

    /// Replace the scan order.
    #[must_use]
    pub const fn with_order(mut self, order: SearchOrder) -> Self {
        self.order = order;
        self
    }

    /// Whether two targets match under this lookup.
    #[must_use]
    pub fn matches(&self, registered: &str, requested: &str) -> bool {
        (self.compare)(registered, requested) == Ordering::Equal
    }

    /// Indices of `len` forms in scan order.
    fn scan(&self, len: usize) -> impl Iterator<Item = usize> + use<> {
        let newest_first = self.order == SearchOrder::NewestFirst;
        (0..len).map(move |i| if newest_first { len - 1 - i } else { i })
    }

    /// Locate the form serving `target` for every operation in `mask`.
    ///
    /// A target that matches only forms lacking some of the operations is
    /// reported as [`ServientError::NotAllowed`]; a target no form carries is
    /// [`ServientError::NotFound`].
    pub fn locate(
        &self,
        forms: &[Form<'_>],
        target: &str,
        mask: OperationSet,
    ) -> ServientResult<usize> {
        let mut target_seen = false;
        for index in self.scan(forms.len()) {
            let form = &forms[index];
            if !self.matches(form.target, target) {
                continue;
            }
            if form.accepts(mask) {
                return Ok(index);
            }
            target_seen = true;
        }
        if target_seen {
            Err(ServientError::NotAllowed)
        } else {
            Err(ServientError::NotFound)
        }
    }
}

impl Default for Lookup {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_bytes(registered: &str, requested: &str) -> Ordering {
    registered.as_bytes().cmp(requested.as_bytes())
}

// ---------------------------------------------------------------------------
// Registry trait
// ---------------------------------------------------------------------------

/// Where [`Thing::insert_or_replace`] put a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Appended at the given index.
    Inserted(usize),
    /// Overwrote the form at the given index.
    Replaced(usize),
}

/// An ordered registry of forms.
///
/// Mutating methods default to [`ServientError::NotAllowed`], which is the
/// behavior of every immutable registry.
pub trait Thing<'h> {
    /// The registered forms, oldest first.
    fn forms(&self) -> &[Form<'h>];

    /// The lookup behavior of this registry.
    fn lookup(&self) -> &Lookup;

    /// Maximum number of forms the registry can hold.
    fn capacity(&self) -> usize {
        self.forms().len()
    }

    /// Number of registered forms.
    fn len(&self) -> usize {
        self.forms().len()
    }

    /// Whether no form is registered.
    fn is_empty(&self) -> bool {
        self.forms().is_empty()
    }

    /// Whether forms can be added, replaced or removed.
    fn is_mutable(&self) -> bool {
        false
    }

    /// Find the form serving `target` for every operation in `mask`.
    fn find(&self, target: &str, mask: OperationSet) -> ServientResult<&Form<'h>> {
        let forms = self.forms();
        let index = self.lookup().locate(forms, target, mask)?;
        Ok(&forms[index])
    }

    /// Overwrite the form sharing `form`'s target and at least one of its
    /// operations, or append `form` when there is none.
    fn insert_or_replace(&mut self, _form: Form<'h>) -> ServientResult<Placement> {
        Err(ServientError::NotAllowed)
    }

    /// Overwrite the form [`Thing::find`] would return for `target` and
    /// `mask`.
    fn replace(
        &mut self,
        _target: &str,
        _mask: OperationSet,
        _form: Form<'h>,
    ) -> ServientResult<()> {
        Err(ServientError::NotAllowed)
    }

    /// Remove the form [`Thing::find`] would return for `target` and `mask`.
    fn remove(&mut self, _target: &str, _mask: OperationSet) -> ServientResult<Form<'h>> {
        Err(ServientError::NotAllowed)
    }
}

// ---------------------------------------------------------------------------
// Static registry
// ---------------------------------------------------------------------------

/// An immutable registry over a borrowed form table.
///
/// # Examples
///
/// ```
/// use servient_core::form::Form;
/// use servient_core::thing::{StaticThing, Thing};
/// use servient_model::{OperationType, ServientError};
///
/// const FORMS: &[Form<'static>] = &[Form::new("/oh", OperationType::SubscribeEvent.into_set())];
///
/// let thing = StaticThing::new(FORMS);
/// assert!(thing.find("/oh", OperationType::SubscribeEvent.into()).is_ok());
/// assert_eq!(
///     thing.find("/oh", OperationType::ReadProperty.into()).unwrap_err(),
///     ServientError::NotAllowed
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StaticThing<'h> {
    forms: &'h [Form<'h>],
    lookup: Lookup,
}

impl<'h> StaticThing<'h> {
    /// A registry over `forms` with the default lookup.
    #[must_use]
    pub const fn new(forms: &'h [Form<'h>]) -> Self {
        Self::with_lookup(forms, Lookup::new())
    }

    /// A registry over `forms` with a custom lookup.
    #[must_use]
    pub const fn with_lookup(forms: &'h [Form<'h>], lookup: Lookup) -> Self {
        Self { forms, lookup }
    }
}

impl<'h> Thing<'h> for StaticThing<'h> {
    fn forms(&self) -> &[Form<'h>] {
        self.forms
    }

    fn lookup(&self) -> &Lookup {
        &self.lookup
    }
}

// ---------------------------------------------------------------------------
// Dynamic registry
// ---------------------------------------------------------------------------

/// A bounded, mutable registry over caller-supplied slots.
///
/// Capacity is the number of slots; the registry never allocates.
#[derive(Debug)]
pub struct DynamicThing<'s, 'h> {
    slots: &'s mut [Form<'h>],
    len: usize,
    lookup: Lookup,
}

impl<'s, 'h> DynamicThing<'s, 'h> {
    /// An empty registry over `slots` with the default lookup.
    #[must_use]
    pub fn new(slots: &'s mut [Form<'h>]) -> Self {
        Self::with_lookup(slots, Lookup::new())
    }

    /// An empty registry over `slots` with a custom lookup.
    #[must_use]
    pub fn with_lookup(slots: &'s mut [Form<'h>], lookup: Lookup) -> Self {
        Self {
            slots,
            len: 0,
            lookup,
        }
    }

    /// A registry over `slots` seeded with a copy of `forms`.
    ///
    /// Fails with [`ServientError::NotEnoughMemory`] when the forms do not
    /// fit.
    pub fn from_forms(
        slots: &'s mut [Form<'h>],
        forms: &[Form<'h>],
        lookup: Lookup,
    ) -> ServientResult<Self> {
        if forms.len() > slots.len() {
            return Err(ServientError::not_enough_memory(forms.len(), slots.len()));
        }
        slots[..forms.len()].copy_from_slice(forms);
        Ok(Self {
            len: forms.len(),
            slots,
            lookup,
        })
    }

    /// How many forms fit into a region of `bytes` bytes.
    #[must_use]
    pub const fn slots_for(bytes: usize) -> usize {
        bytes / mem::size_of::<Form<'static>>()
    }

    /// Remove every form.
    pub fn clear(&mut self) {
        self.slots[..self.len].fill(Form::VACANT);
        self.len = 0;
    }
}

impl<'h> Thing<'h> for DynamicThing<'_, 'h> {
    fn forms(&self) -> &[Form<'h>] {
        &self.slots[..self.len]
    }

    fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn is_mutable(&self) -> bool {
        true
    }

    fn insert_or_replace(&mut self, form: Form<'h>) -> ServientResult<Placement> {
        if form.allowed.is_empty() {
            return Err(ServientError::NotAllowed);
        }

        let existing = self.lookup.scan(self.len).find(|&index| {
            let current = &self.slots[index];
            self.lookup.matches(current.target, form.target)
                && current.allowed.intersects(form.allowed)
        });

        if let Some(index) = existing {
            self.slots[index] = form;
            debug!(href = form.target, operations = %form.allowed, index, "replaced form");
            return Ok(Placement::Replaced(index));
        }

        if self.len == self.slots.len() {
            return Err(ServientError::not_enough_memory(1, 0));
        }
        let index = self.len;
        self.slots[index] = form;
        self.len += 1;
        debug!(href = form.target, operations = %form.allowed, index, "inserted form");
        Ok(Placement::Inserted(index))
    }

    fn replace(&mut self, target: &str, mask: OperationSet, form: Form<'h>) -> ServientResult<()> {
        if form.allowed.is_empty() {
            return Err(ServientError::NotAllowed);
        }
        let index = self.lookup.locate(&self.slots[..self.len], target, mask)?;
        self.slots[index] = form;
        debug!(href = target, operations = %form.allowed, index, "replaced form");
        Ok(())
    }

    fn remove(&mut self, target: &str, mask: OperationSet) -> ServientResult<Form<'h>> {
        let index = self.lookup.locate(&self.slots[..self.len], target, mask)?;
        let removed = self.slots[index];
        self.slots[index..self.len].rotate_left(1);
        self.len -= 1;
        self.slots[self.len] = Form::VACANT;
        debug!(href = target, index, "removed form");
        Ok(removed)
    }
}
