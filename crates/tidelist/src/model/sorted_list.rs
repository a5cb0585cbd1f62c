//! Sorted, diffable list.
//!
//! `SortedList<T, C>` keeps its items ordered by a [`SortCallback`] and
//! reports every mutation as the smallest set of [`ListChange`]s a view needs
//! to animate exactly the rows that changed.
//!
//! # Upsert semantics
//!
//! - a new identity is inserted after every item that compares `Equal`, so
//!   ties keep insertion order
//! - an existing identity whose new value still sorts into the same slot is
//!   replaced in place, emitting `changed` only if its contents differ
//! - an existing identity that sorts elsewhere emits `changed` at the old
//!   position (if its contents differ) followed by `moved`
//!
//! # Batching
//!
//! [`SortedList::batch`] returns a guard that coalesces adjacent changes and
//! flushes them when dropped, whether the scope ends normally or early.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Deref, DerefMut, Index};

use tidelist_core::logging::{span_names, targets};
use tidelist_core::PerfSpan;

use super::callback::SortCallback;
use super::change::{ChangeCoalescer, ListChange, ListSignals};
use crate::config::ListConfig;

/// An always-sorted collection of identity-unique items.
///
/// The list is designed for single-owner use: every mutation takes
/// `&mut self` and notifies synchronously before returning.
///
/// # Example
///
/// ```
/// use tidelist::model::{KeyedSortCallback, ListChange, SortedList};
///
/// #[derive(Clone, PartialEq)]
/// struct Row {
///     id: u64,
///     key: &'static str,
/// }
///
/// let mut list = SortedList::new(KeyedSortCallback::new(|r: &Row| r.id, |a, b| a.key.cmp(b.key)));
/// list.signals().changes.connect(|change| println!("{change}"));
///
/// list.upsert_batch([
///     Row { id: 3, key: "c" },
///     Row { id: 1, key: "a" },
///     Row { id: 2, key: "b" },
/// ]);
/// assert_eq!(list.iter().map(|r| r.key).collect::<Vec<_>>(), ["a", "b", "c"]);
///
/// list.upsert(Row { id: 1, key: "z" });
/// assert_eq!(list.iter().map(|r| r.key).collect::<Vec<_>>(), ["b", "c", "z"]);
/// ```
pub struct SortedList<T, C> {
    items: Vec<T>,
    callback: C,
    signals: ListSignals,
    batch: Option<ChangeCoalescer>,
}

impl<T, C: SortCallback<T>> SortedList<T, C> {
    /// Creates an empty list ordered by `callback`.
    pub fn new(callback: C) -> Self {
        Self::with_capacity(callback, 0)
    }

    /// Creates an empty list with room for `capacity` items.
    ///
    /// The capacity is a hint only; the list grows past it as needed.
    pub fn with_capacity(callback: C, capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            callback,
            signals: ListSignals::new(),
            batch: None,
        }
    }

    /// Creates an empty list sized according to `config`.
    pub fn with_config(callback: C, config: &ListConfig) -> Self {
        Self::with_capacity(callback, config.capacity_hint)
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Returns the position of the item sharing `item`'s identity.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items
            .iter()
            .position(|existing| self.callback.are_items_the_same(existing, item))
    }

    /// Returns `true` if an item with `item`'s identity is present.
    pub fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }
}

impl<T, C> SortedList<T, C> {
    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the item at `position`, or `None` past the end.
    pub fn get(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    /// Returns the first item in sort order.
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Returns the last item in sort order.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Iterates over the items in sort order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns the items as a sorted slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Returns the ordering policy.
    pub fn callback(&self) -> &C {
        &self.callback
    }

    /// Returns mutable access to the ordering policy.
    ///
    /// Call [`resort`](SortedList::resort) after changing the order it
    /// imposes.
    pub fn callback_mut(&mut self) -> &mut C {
        &mut self.callback
    }

    /// Returns the signals for this list.
    pub fn signals(&self) -> &ListSignals {
        &self.signals
    }

    /// Returns `true` while a batch is open.
    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }
}

impl<T, C: SortCallback<T>> SortedList<T, C> {
    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Inserts `item`, or replaces the item sharing its identity.
    ///
    /// Returns the item's position after the operation.
    pub fn upsert(&mut self, item: T) -> usize {
        let position = match self.index_of(&item) {
            Some(index) => self.replace_at(index, item),
            None => self.insert_new(item),
        };
        self.debug_assert_sorted();
        position
    }

    /// Upserts every item inside a single batch.
    pub fn upsert_batch<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut batch = self.batch();
        for item in items {
            batch.upsert(item);
        }
    }

    /// Replaces the item at `position` with `item`, re-sorting as needed.
    ///
    /// If another item already carries `item`'s identity it is removed first,
    /// so identities stay unique. Returns the new position, or `None` if
    /// `position` is out of range.
    pub fn update_at(&mut self, position: usize, item: T) -> Option<usize> {
        if position >= self.items.len() {
            return None;
        }

        let mut position = position;
        if let Some(duplicate) = self.index_of(&item).filter(|&index| index != position) {
            self.remove_at(duplicate);
            if duplicate < position {
                position -= 1;
            }
        }

        let new_position = self.replace_at(position, item);
        self.debug_assert_sorted();
        Some(new_position)
    }

    /// Removes the item sharing `item`'s identity.
    ///
    /// Returns `None` without notifying if no such item exists.
    pub fn remove(&mut self, item: &T) -> Option<T> {
        match self.index_of(item) {
            Some(index) => self.remove_at(index),
            None => {
                tracing::trace!(target: targets::SORTED_LIST, "remove: item not present");
                None
            }
        }
    }

    /// Removes the item at `position`.
    ///
    /// Returns `None` without notifying if `position` is out of range.
    pub fn remove_at(&mut self, position: usize) -> Option<T> {
        if position >= self.items.len() {
            tracing::trace!(target: targets::SORTED_LIST, position, "remove_at: out of range");
            return None;
        }
        let removed = self.items.remove(position);
        self.notify(ListChange::removed(position, 1));
        Some(removed)
    }

    /// Removes every item, emitting one removal spanning the prior size.
    pub fn clear(&mut self) {
        let count = self.items.len();
        if count == 0 {
            return;
        }
        self.items.clear();
        tracing::debug!(target: targets::SORTED_LIST, count, "list cleared");
        self.notify(ListChange::removed(0, count));
    }

    /// Makes the list hold exactly `items`.
    ///
    /// Items whose identity is absent from `items` are removed first, then
    /// every incoming item is upserted, all inside one batch.
    pub fn replace_all(&mut self, items: Vec<T>) {
        let _span = PerfSpan::new(span_names::REPLACE_ALL);
        let mut batch = self.batch();

        let mut index = batch.items.len();
        while index > 0 {
            index -= 1;
            if !batch.is_retained(index, &items) {
                batch.remove_at(index);
            }
        }

        for item in items {
            batch.upsert(item);
        }
    }

    /// Restores sort order after the ordering policy changed.
    ///
    /// Items are reordered stably and every displaced item is reported as
    /// one move. Returns the number of moves.
    pub fn resort(&mut self) -> usize {
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by(|&a, &b| self.callback.compare(&self.items[a], &self.items[b]));

        let mut current: Vec<usize> = (0..self.items.len()).collect();
        let mut moves = 0;
        for (target, &wanted) in order.iter().enumerate() {
            let Some(from) = current[target..]
                .iter()
                .position(|&index| index == wanted)
                .map(|offset| target + offset)
            else {
                continue;
            };
            if from != target {
                current[target..=from].rotate_right(1);
                self.items[target..=from].rotate_right(1);
                self.notify(ListChange::moved(from, target));
                moves += 1;
            }
        }

        if moves > 0 {
            tracing::debug!(target: targets::SORTED_LIST, moves, "list re-sorted");
        }
        self.debug_assert_sorted();
        moves
    }

    /// Opens a batch.
    ///
    /// Changes made through the returned guard are coalesced and delivered
    /// when the guard is dropped.
    ///
    /// Batches must not be nested. Doing so panics in debug builds; in
    /// release builds the inner bracket is ignored.
    pub fn batch(&mut self) -> BatchUpdate<'_, T, C> {
        let owns_batch = self.batch.is_none();
        debug_assert!(owns_batch, "SortedList batches must not be nested");
        if owns_batch {
            tracing::trace!(target: targets::SORTED_LIST, "batch opened");
            self.batch = Some(ChangeCoalescer::default());
        }
        BatchUpdate {
            list: self,
            owns_batch,
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Upper bound: the index after every item not greater than `item`.
    fn insertion_point(&self, item: &T) -> usize {
        self.items
            .partition_point(|probe| self.callback.compare(probe, item) != Ordering::Greater)
    }

    /// Returns `true` if `item` may replace the item at `index` without
    /// breaking the order.
    fn fits_at(&self, index: usize, item: &T) -> bool {
        let after_previous = index == 0
            || self.callback.compare(&self.items[index - 1], item) != Ordering::Greater;
        let before_next = index + 1 >= self.items.len()
            || self.callback.compare(item, &self.items[index + 1]) != Ordering::Greater;
        after_previous && before_next
    }

    fn is_retained(&self, index: usize, incoming: &[T]) -> bool {
        let existing = &self.items[index];
        incoming
            .iter()
            .any(|item| self.callback.are_items_the_same(existing, item))
    }

    fn insert_new(&mut self, item: T) -> usize {
        let index = self.insertion_point(&item);
        self.items.insert(index, item);
        tracing::trace!(target: targets::SORTED_LIST, index, "item inserted");
        self.notify(ListChange::inserted(index, 1));
        index
    }

    fn replace_at(&mut self, index: usize, item: T) -> usize {
        let contents_same = self
            .callback
            .are_contents_the_same(&self.items[index], &item);

        if self.fits_at(index, &item) {
            self.items[index] = item;
            if !contents_same {
                self.notify(ListChange::changed(index, 1));
            }
            return index;
        }

        self.items.remove(index);
        let new_index = self.insertion_point(&item);
        self.items.insert(new_index, item);
        tracing::trace!(target: targets::SORTED_LIST, from = index, to = new_index, "item moved");

        if !contents_same {
            self.notify(ListChange::changed(index, 1));
        }
        if new_index != index {
            self.notify(ListChange::moved(index, new_index));
        }
        new_index
    }

    fn notify(&mut self, change: ListChange) {
        let signals = &self.signals;
        match self.batch.as_mut() {
            Some(batch) => batch.push(change, &mut |c| signals.emit(c)),
            None => signals.emit(change),
        }
    }

    fn end_batch(&mut self) {
        if let Some(mut batch) = self.batch.take() {
            let _span = PerfSpan::new(span_names::BATCH_FLUSH);
            let signals = &self.signals;
            batch.flush(&mut |c| signals.emit(c));
            tracing::debug!(target: targets::SORTED_LIST, len = self.items.len(), "batch flushed");
        }
    }

    fn debug_assert_sorted(&self) {
        debug_assert!(
            self.items
                .windows(2)
                .all(|pair| self.callback.compare(&pair[0], &pair[1]) != Ordering::Greater),
            "SortedList order violated; is the comparator a total order?"
        );
    }
}

impl<T, C: SortCallback<T>> Index<usize> for SortedList<T, C> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `position >= len()`.
    fn index(&self, position: usize) -> &T {
        let len = self.items.len();
        self.items.get(position).unwrap_or_else(|| {
            panic!("SortedList index out of range: position {position}, len {len}")
        })
    }
}

impl<'a, T, C: SortCallback<T>> IntoIterator for &'a SortedList<T, C> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SortedList<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedList")
            .field("items", &self.items)
            .field("batching", &self.batch.is_some())
            .finish()
    }
}

/// An open batch on a [`SortedList`].
///
/// Dereferences to the list. Pending changes are flushed when the guard is
/// dropped, including during early returns and unwinding.
pub struct BatchUpdate<'a, T, C: SortCallback<T>> {
    list: &'a mut SortedList<T, C>,
    owns_batch: bool,
}

impl<T, C: SortCallback<T>> BatchUpdate<'_, T, C> {
    /// Closes the batch now, flushing pending changes.
    pub fn finish(self) {}
}

impl<T, C: SortCallback<T>> Deref for BatchUpdate<'_, T, C> {
    type Target = SortedList<T, C>;

    fn deref(&self) -> &Self::Target {
        self.list
    }
}

impl<T, C: SortCallback<T>> DerefMut for BatchUpdate<'_, T, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.list
    }
}

impl<T, C: SortCallback<T>> Drop for BatchUpdate<'_, T, C> {
    fn drop(&mut self) {
        if self.owns_batch {
            self.list.end_batch();
        }
    }
}
