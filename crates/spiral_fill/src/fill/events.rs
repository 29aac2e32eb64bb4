//! Event types and sinks for observing fill runs.
//!
//! This module defines [`FillEvent`] and a set of sinks to emit, collect, or forward
//! events while items are assigned via [`crate::fill::planner::FillPlanner`] or
//! [`crate::fill::assign::assign_ranked_items_with_events`].
use crate::grid::{CellCoord, GridDims};

/// Why a cell in the visit order was passed over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Unusable,
    Occupied,
}

/// Describes events emitted by fill operations.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum FillEvent {
    /// Emitted when a run starts.
    RunStarted {
        /// Dimensions of the grid being filled.
        dims: GridDims,
        /// Number of cells in the visit order.
        order_len: usize,
        /// Cells that are usable and unoccupied at the start of the run.
        available: usize,
    },

    /// Emitted when the run finishes.
    RunFinished {
        placed: usize,
        excluded: usize,
        unplaced: usize,
    },

    /// An item matched an exclusion rule.
    ItemExcluded {
        /// Position of the item in the ranked input.
        rank: usize,
        /// Name of the first matching rule.
        rule: String,
    },

    /// A cell in the visit order was passed over.
    CellSkipped { cell: CellCoord, reason: SkipReason },

    /// An item was assigned to a cell.
    ItemPlaced { rank: usize, cell: CellCoord },

    /// An item was left over after the visit order ran out.
    ItemUnplaced { rank: usize },

    /// Non-fatal warning generated during a fill.
    Warning {
        /// Context string (e.g. grid dimensions).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`FillEvent`], used to filter what a sink receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FillEventKind {
    RunStarted,
    RunFinished,
    ItemExcluded,
    CellSkipped,
    ItemPlaced,
    ItemUnplaced,
    Warning,
}

impl FillEvent {
    pub fn kind(&self) -> FillEventKind {
        match self {
            FillEvent::RunStarted { .. } => FillEventKind::RunStarted,
            FillEvent::RunFinished { .. } => FillEventKind::RunFinished,
            FillEvent::ItemExcluded { .. } => FillEventKind::ItemExcluded,
            FillEvent::CellSkipped { .. } => FillEventKind::CellSkipped,
            FillEvent::ItemPlaced { .. } => FillEventKind::ItemPlaced,
            FillEvent::ItemUnplaced { .. } => FillEventKind::ItemUnplaced,
            FillEvent::Warning { .. } => FillEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`FillEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: FillEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: FillEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = FillEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: FillEvent) {}

    #[inline]
    fn wants(&self, _kind: FillEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(FillEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(FillEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(FillEvent),
{
    #[inline]
    fn send(&mut self, event: FillEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally only some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<FillEvent>,
    only: Option<Vec<FillEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            only: None,
        }
    }

    /// Collect only the listed kinds.
    pub fn only(kinds: impl IntoIterator<Item = FillEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<FillEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[FillEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: FillEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: FillEventKind) -> bool {
        self.only.as_ref().is_none_or(|k| k.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: FillEvent) {
        let kind = event.kind();
        let Some(last_idx) = self.sinks.iter().rposition(|s| s.wants(kind)) else {
            return;
        };
        for i in 0..last_idx {
            if self.sinks[i].wants(kind) {
                self.sinks[i].send(event.clone());
            }
        }
        self.sinks[last_idx].send(event);
    }

    fn wants(&self, kind: FillEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
