//! Call frames and the handles that address their locals.
//!
//! A frame owns its locals in a slot arena. Locals are addressed by a
//! [`LocalRef`] handle (frame serial, slot index, slot generation) rather
//! than by pointer, so a handle stays valid while other locals are added
//! to the same frame and becomes detectably stale once its frame is popped
//! or its local is deleted. Deleted slots are recycled under a new
//! generation, so a frame that keeps declaring and deleting locals stays
//! the size of its peak live set.

use std::fmt;

use rustc_hash::FxHashMap;
use vera_ir::{LookupLocation, Span, SubroutineId, SymbolId};
use vera_value::ConstantValue;

/// Handle to one local's storage.
///
/// `frame` is the serial number of the owning frame. A context never hands
/// out the same serial twice, so a handle into a popped frame cannot alias
/// a newer frame.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct LocalRef {
    pub(crate) frame: u32,
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl LocalRef {
    /// Serial of the frame that owns the storage.
    #[inline]
    pub fn frame(self) -> u32 {
        self.frame
    }
}

impl fmt::Debug for LocalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "local#{}.{}@{}", self.frame, self.slot, self.generation)
    }
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    value: Option<ConstantValue>,
}

/// One activation record.
#[derive(Clone, Debug)]
pub struct Frame {
    serial: u32,
    subroutine: Option<SubroutineId>,
    call_location: Span,
    lookup_location: LookupLocation,
    temporaries: FxHashMap<SymbolId, u32>,
    slots: Vec<Slot>,
    /// Emptied slots, ready for reuse.
    free: Vec<u32>,
}

impl Frame {
    pub(crate) fn new(
        serial: u32,
        subroutine: Option<SubroutineId>,
        call_location: Span,
        lookup_location: LookupLocation,
    ) -> Self {
        Frame {
            serial,
            subroutine,
            call_location,
            lookup_location,
            temporaries: FxHashMap::default(),
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// A frame with no subroutine, used for the root scope and for
    /// [`push_empty_frame`](crate::EvalContext::push_empty_frame).
    pub(crate) fn synthetic(serial: u32) -> Self {
        Frame::new(serial, None, Span::DUMMY, LookupLocation::NONE)
    }

    #[inline]
    pub fn serial(&self) -> u32 {
        self.serial
    }

    /// The subroutine being executed, `None` for synthetic frames.
    #[inline]
    pub fn subroutine(&self) -> Option<SubroutineId> {
        self.subroutine
    }

    /// Where the call that created this frame happened.
    #[inline]
    pub fn call_location(&self) -> Span {
        self.call_location
    }

    #[inline]
    pub fn lookup_location(&self) -> LookupLocation {
        self.lookup_location
    }

    /// Number of live locals.
    pub fn local_count(&self) -> usize {
        self.temporaries.len()
    }

    /// Number of slots allocated, live or free.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn handle(&self, slot: u32) -> LocalRef {
        LocalRef {
            frame: self.serial,
            slot,
            generation: self.slots[slot as usize].generation,
        }
    }

    /// Create or overwrite the storage for `symbol`.
    ///
    /// Re-declaring a symbol reuses its slot, so existing handles to it see
    /// the new value.
    pub(crate) fn create(&mut self, symbol: SymbolId, value: ConstantValue) -> LocalRef {
        let slot = match self.temporaries.get(&symbol) {
            Some(&slot) => slot,
            None => {
                let slot = match self.free.pop() {
                    Some(slot) => slot,
                    None => {
                        let slot = u32::try_from(self.slots.len())
                            .unwrap_or_else(|_| panic!("frame exceeded u32::MAX locals"));
                        self.slots.push(Slot::default());
                        slot
                    }
                };
                self.temporaries.insert(symbol, slot);
                slot
            }
        };
        self.slots[slot as usize].value = Some(value);
        self.handle(slot)
    }

    pub(crate) fn find(&self, symbol: SymbolId) -> Option<LocalRef> {
        self.temporaries.get(&symbol).map(|&slot| self.handle(slot))
    }

    /// Drop the storage for `symbol`. The slot moves to a new generation
    /// before it is reused, so outstanding handles resolve to `None` instead
    /// of a later local.
    pub(crate) fn delete(&mut self, symbol: SymbolId) {
        if let Some(slot) = self.temporaries.remove(&symbol) {
            let entry = &mut self.slots[slot as usize];
            entry.value = None;
            entry.generation = entry.generation.wrapping_add(1);
            self.free.push(slot);
        }
    }

    pub(crate) fn get(&self, local: LocalRef) -> Option<&ConstantValue> {
        self.slots
            .get(local.slot as usize)
            .filter(|s| s.generation == local.generation)
            .and_then(|s| s.value.as_ref())
    }

    pub(crate) fn get_mut(&mut self, local: LocalRef) -> Option<&mut ConstantValue> {
        self.slots
            .get_mut(local.slot as usize)
            .filter(|s| s.generation == local.generation)
            .and_then(|s| s.value.as_mut())
    }

    /// Current value of `symbol` in this frame.
    pub fn value_of(&self, symbol: SymbolId) -> Option<&ConstantValue> {
        self.temporaries
            .get(&symbol)
            .and_then(|&slot| self.slots[slot as usize].value.as_ref())
    }
}
