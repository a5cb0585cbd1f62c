//! Positional change notifications.
//!
//! Every mutation of a list is described by one or more [`ListChange`]s and
//! delivered through [`ListSignals`]. Positions always refer to the list as it
//! is at the moment the change is emitted, so a consumer that applies changes
//! one by one, in order, stays in sync with the source.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tidelist_core::logging::targets;
use tidelist_core::{ConnectionId, Signal};

/// A single positional change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListChange {
    /// `count` rows were inserted starting at `position`.
    Inserted { position: usize, count: usize },
    /// `count` rows were removed starting at `position`.
    Removed { position: usize, count: usize },
    /// One row moved. `to` is its index after the move.
    Moved { from: usize, to: usize },
    /// The contents of `count` rows starting at `position` changed.
    Changed { position: usize, count: usize },
}

impl ListChange {
    /// Creates an insertion of `count` rows.
    pub fn inserted(position: usize, count: usize) -> Self {
        Self::Inserted { position, count }
    }

    /// Creates a removal of `count` rows.
    pub fn removed(position: usize, count: usize) -> Self {
        Self::Removed { position, count }
    }

    /// Creates a single-row move.
    pub fn moved(from: usize, to: usize) -> Self {
        Self::Moved { from, to }
    }

    /// Creates a content change of `count` rows.
    pub fn changed(position: usize, count: usize) -> Self {
        Self::Changed { position, count }
    }

    /// Returns the change in row count this change causes.
    pub fn size_delta(&self) -> isize {
        match *self {
            Self::Inserted { count, .. } => count as isize,
            Self::Removed { count, .. } => -(count as isize),
            Self::Moved { .. } | Self::Changed { .. } => 0,
        }
    }

    /// Returns the same change shifted `by` rows further down.
    pub fn offset(self, by: usize) -> Self {
        match self {
            Self::Inserted { position, count } => Self::inserted(position + by, count),
            Self::Removed { position, count } => Self::removed(position + by, count),
            Self::Moved { from, to } => Self::moved(from + by, to + by),
            Self::Changed { position, count } => Self::changed(position + by, count),
        }
    }
}

impl fmt::Display for ListChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inserted { position, count } => write!(f, "inserted({position}, {count})"),
            Self::Removed { position, count } => write!(f, "removed({position}, {count})"),
            Self::Moved { from, to } => write!(f, "moved({from}, {to})"),
            Self::Changed { position, count } => write!(f, "changed({position}, {count})"),
        }
    }
}

/// Collection of signals emitted by list models.
///
/// Views connect to these signals to stay synchronized with the list. The
/// kind-specific signal fires first, then `changes`.
///
/// # Signal Usage
///
/// - **Per-kind**: `inserted`, `removed`, `changed` carry `(position, count)`;
///   `moved` carries `(from, to)`
/// - **Everything, in order**: `changes` carries each [`ListChange`]
pub struct ListSignals {
    /// Emitted after rows have been inserted.
    /// Args: (position, count)
    pub inserted: Signal<(usize, usize)>,

    /// Emitted after rows have been removed.
    /// Args: (position, count)
    pub removed: Signal<(usize, usize)>,

    /// Emitted after a row has moved.
    /// Args: (from, to)
    pub moved: Signal<(usize, usize)>,

    /// Emitted after the contents of rows changed.
    /// Args: (position, count)
    pub changed: Signal<(usize, usize)>,

    /// Emitted for every change, in emission order.
    pub changes: Signal<ListChange>,
}

impl Default for ListSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ListSignals {
    /// Creates a new set of list signals.
    pub fn new() -> Self {
        Self {
            inserted: Signal::new(),
            removed: Signal::new(),
            moved: Signal::new(),
            changed: Signal::new(),
            changes: Signal::new(),
        }
    }

    /// Emits `change` on its kind-specific signal, then on `changes`.
    pub fn emit(&self, change: ListChange) {
        tracing::trace!(target: targets::SORTED_LIST, %change, "emitting list change");
        match change {
            ListChange::Inserted { position, count } => self.inserted.emit((position, count)),
            ListChange::Removed { position, count } => self.removed.emit((position, count)),
            ListChange::Moved { from, to } => self.moved.emit((from, to)),
            ListChange::Changed { position, count } => self.changed.emit((position, count)),
        }
        self.changes.emit(change);
    }
}

static_assertions::assert_impl_all!(ListSignals: Send, Sync);
static_assertions::assert_impl_all!(ListChange: Copy, Send, Sync);

/// Records every change emitted by one or more [`ListSignals`].
///
/// Useful for composing lists: an owner drains the recorder right after each
/// operation on an inner list and translates the positions it finds.
#[derive(Clone, Default)]
pub struct ChangeRecorder {
    changes: Arc<Mutex<Vec<ListChange>>>,
}

impl ChangeRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts recording the changes of `signals`.
    pub fn attach(&self, signals: &ListSignals) -> ConnectionId {
        let changes = self.changes.clone();
        signals.changes.connect(move |change| changes.lock().push(*change))
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<ListChange> {
        std::mem::take(&mut *self.changes.lock())
    }

    /// Returns the number of changes waiting to be taken.
    pub fn len(&self) -> usize {
        self.changes.lock().len()
    }

    /// Returns `true` if nothing has been recorded since the last `take`.
    pub fn is_empty(&self) -> bool {
        self.changes.lock().is_empty()
    }
}

impl fmt::Debug for ChangeRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeRecorder")
            .field("pending", &self.len())
            .finish()
    }
}

/// Coalesces adjacent changes while a batch is open.
///
/// Only the most recent change is held back. A new change either extends it
/// or pushes it out:
///
/// - insertions merge when the new range starts inside or right after the
///   pending one
/// - removals merge when the pending range starts inside or right after the
///   new one
/// - content changes merge when the ranges overlap or touch
/// - moves never merge
#[derive(Debug, Default)]
pub(crate) struct ChangeCoalescer {
    pending: Option<ListChange>,
}

impl ChangeCoalescer {
    /// Adds `change`, emitting whatever it displaces.
    pub(crate) fn push(&mut self, change: ListChange, emit: &mut impl FnMut(ListChange)) {
        let merged = match (self.pending, change) {
            (
                Some(ListChange::Inserted { position: last, count: last_count }),
                ListChange::Inserted { position, count },
            ) if position >= last && position <= last + last_count => {
                Some(ListChange::inserted(last, last_count + count))
            }
            (
                Some(ListChange::Removed { position: last, count: last_count }),
                ListChange::Removed { position, count },
            ) if last >= position && last <= position + count => {
                Some(ListChange::removed(position, last_count + count))
            }
            (
                Some(ListChange::Changed { position: last, count: last_count }),
                ListChange::Changed { position, count },
            ) if position <= last + last_count && position + count >= last => {
                let start = last.min(position);
                let end = (last + last_count).max(position + count);
                Some(ListChange::changed(start, end - start))
            }
            _ => None,
        };

        match merged {
            Some(merged) => self.pending = Some(merged),
            None => {
                self.flush(emit);
                if let ListChange::Moved { .. } = change {
                    emit(change);
                } else {
                    self.pending = Some(change);
                }
            }
        }
    }

    /// Emits the pending change, if any.
    pub(crate) fn flush(&mut self, emit: &mut impl FnMut(ListChange)) {
        if let Some(change) = self.pending.take() {
            emit(change);
        }
    }
}
