//! Two-level sorted list with expandable groups.
//!
//! A `GroupSortedList` keeps a sorted list of groups and, for every group, a
//! sorted list of items. Views see a single flat *visual* sequence: each group
//! contributes a header row followed (or, with `children_above_group`,
//! preceded) by its item rows. A collapsed group contributes only its header.
//! With `display_empty_cell`, an expanded group without items shows one
//! placeholder row.
//!
//! ```text
//! children below           children above
//! 0  Header(A)             0  Item(A, a1)
//! 1  Item(A, a1)           1  Item(A, a2)
//! 2  Item(A, a2)           2  Header(A)
//! 3  Header(B)             3  Empty(B)
//! 4  Empty(B)              4  Header(B)
//! ```
//!
//! Every mutation is reported on [`signals`](GroupSortedList::signals) in
//! visual positions, so a consumer applying the changes in order keeps an
//! exact copy of the visual sequence.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tidelist_core::logging::{span_names, targets};
use tidelist_core::PerfSpan;

use super::callback::SortCallback;
use super::change::{ChangeRecorder, ListChange, ListSignals};
use super::sorted_list::SortedList;
use crate::config::GroupListConfig;

/// Ordering and identity policy for groups.
pub trait GroupCallback<G> {
    /// Total order used to position groups.
    fn compare(&self, a: &G, b: &G) -> Ordering;

    /// Returns `true` if the displayed header data is identical.
    fn are_contents_the_same(&self, old: &G, new: &G) -> bool;

    /// Identifier unique among all groups.
    fn group_id(&self, group: &G) -> u64;
}

/// Ordering and identity policy for the items inside a group.
pub trait ItemCallback<G, I> {
    /// Total order used to position items within `group`.
    fn compare(&self, group: &G, a: &I, b: &I) -> Ordering;

    /// Returns `true` if the displayed item data is identical.
    fn are_contents_the_same(&self, old: &I, new: &I) -> bool;

    /// Identifier unique among all items of all groups.
    fn item_id(&self, item: &I) -> u64;
}

/// A row of the visual sequence.
#[derive(Debug, PartialEq)]
pub enum GroupRow<'a, G, I> {
    /// A group header.
    Header { group: &'a G, expanded: bool },
    /// An item of `group`.
    Item { group: &'a G, item: &'a I },
    /// The placeholder shown by an expanded group without items.
    Empty { group: &'a G },
}

impl<'a, G, I> GroupRow<'a, G, I> {
    /// Returns the group this row belongs to.
    pub fn group(&self) -> &'a G {
        match *self {
            Self::Header { group, .. } | Self::Item { group, .. } | Self::Empty { group } => group,
        }
    }
}

struct GroupOrder<GC> {
    callback: Arc<GC>,
}

impl<G, GC: GroupCallback<G>> SortCallback<G> for GroupOrder<GC> {
    fn compare(&self, a: &G, b: &G) -> Ordering {
        self.callback.compare(a, b)
    }

    fn are_items_the_same(&self, a: &G, b: &G) -> bool {
        self.callback.group_id(a) == self.callback.group_id(b)
    }

    fn are_contents_the_same(&self, old: &G, new: &G) -> bool {
        self.callback.are_contents_the_same(old, new)
    }
}

/// Item policy bound to the group that owns the list.
struct ScopedItemOrder<G, IC> {
    group: G,
    callback: Arc<IC>,
}

impl<G, I, IC: ItemCallback<G, I>> SortCallback<I> for ScopedItemOrder<G, IC> {
    fn compare(&self, a: &I, b: &I) -> Ordering {
        self.callback.compare(&self.group, a, b)
    }

    fn are_items_the_same(&self, a: &I, b: &I) -> bool {
        self.callback.item_id(a) == self.callback.item_id(b)
    }

    fn are_contents_the_same(&self, old: &I, new: &I) -> bool {
        self.callback.are_contents_the_same(old, new)
    }
}

type ItemList<G, I, IC> = SortedList<I, ScopedItemOrder<G, IC>>;

/// Sorted groups of sorted items, flattened into visual rows.
///
/// Groups are identified by [`GroupCallback::group_id`] and items by
/// [`ItemCallback::item_id`]. Expanded state is remembered per group id, so
/// it survives the group moving or being removed and re-added.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use tidelist::config::GroupListConfig;
/// use tidelist::model::{GroupCallback, GroupRow, GroupSortedList, ItemCallback};
///
/// #[derive(Clone, PartialEq)]
/// struct Entry {
///     id: u64,
///     name: &'static str,
/// }
///
/// struct ByName;
///
/// impl GroupCallback<Entry> for ByName {
///     fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
///         a.name.cmp(b.name)
///     }
///     fn are_contents_the_same(&self, old: &Entry, new: &Entry) -> bool {
///         old == new
///     }
///     fn group_id(&self, group: &Entry) -> u64 {
///         group.id
///     }
/// }
///
/// impl ItemCallback<Entry, Entry> for ByName {
///     fn compare(&self, _group: &Entry, a: &Entry, b: &Entry) -> Ordering {
///         a.name.cmp(b.name)
///     }
///     fn are_contents_the_same(&self, old: &Entry, new: &Entry) -> bool {
///         old == new
///     }
///     fn item_id(&self, item: &Entry) -> u64 {
///         item.id
///     }
/// }
///
/// let config = GroupListConfig::default().with_expanded_by_default(true);
/// let mut list = GroupSortedList::new(ByName, ByName, config);
/// let week = Entry { id: 1, name: "This week" };
/// list.add_or_update_items(
///     week.clone(),
///     [Entry { id: 10, name: "Quiz" }, Entry { id: 11, name: "Essay" }],
/// );
///
/// assert_eq!(list.len(), 3);
/// assert!(list.is_group_position(0));
/// assert!(matches!(list.row_at(1), Some(GroupRow::Item { item, .. }) if item.name == "Essay"));
///
/// list.collapse_group(week.id, false);
/// assert_eq!(list.len(), 1);
/// ```
pub struct GroupSortedList<G, I, GC, IC> {
    groups: SortedList<G, GroupOrder<GC>>,
    items: HashMap<u64, ItemList<G, I, IC>>,
    group_callback: Arc<GC>,
    item_callback: Arc<IC>,
    group_changes: ChangeRecorder,
    item_changes: ChangeRecorder,
    expanded: HashMap<u64, bool>,
    config: GroupListConfig,
    signals: ListSignals,
}

impl<G, I, GC, IC> GroupSortedList<G, I, GC, IC>
where
    G: Clone,
    GC: GroupCallback<G>,
    IC: ItemCallback<G, I>,
{
    /// Creates an empty list.
    pub fn new(group_callback: GC, item_callback: IC, config: GroupListConfig) -> Self {
        let group_callback = Arc::new(group_callback);
        let groups = SortedList::new(GroupOrder {
            callback: group_callback.clone(),
        });
        let group_changes = ChangeRecorder::new();
        group_changes.attach(groups.signals());

        Self {
            groups,
            items: HashMap::new(),
            group_callback,
            item_callback: Arc::new(item_callback),
            group_changes,
            item_changes: ChangeRecorder::new(),
            expanded: HashMap::new(),
            config,
            signals: ListSignals::new(),
        }
    }

    /// Returns the signals reporting visual changes.
    pub fn signals(&self) -> &ListSignals {
        &self.signals
    }

    /// Returns the layout settings.
    pub fn config(&self) -> &GroupListConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Stored structure
    // -------------------------------------------------------------------------

    /// Returns the number of groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns all groups in sort order.
    pub fn groups(&self) -> &[G] {
        self.groups.as_slice()
    }

    /// Returns the group with `group_id`.
    pub fn group(&self, group_id: u64) -> Option<&G> {
        self.stored_position(group_id)
            .and_then(|stored| self.groups.get(stored))
    }

    /// Returns the number of items stored in a group, visible or not.
    pub fn group_item_count(&self, group_id: u64) -> usize {
        self.items.get(&group_id).map_or(0, |list| list.len())
    }

    /// Returns the items of a group in sort order.
    pub fn items(&self, group_id: u64) -> &[I] {
        self.items
            .get(&group_id)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the item at `stored` within a group.
    pub fn item(&self, group_id: u64, stored: usize) -> Option<&I> {
        self.items.get(&group_id).and_then(|list| list.get(stored))
    }

    /// Returns the position of `item` within its group's items.
    pub fn stored_index_of_item(&self, group_id: u64, item: &I) -> Option<usize> {
        self.items.get(&group_id).and_then(|list| list.index_of(item))
    }

    /// Returns `true` if the group's children are shown.
    ///
    /// Groups never expanded or collapsed follow `expanded_by_default`.
    pub fn is_group_expanded(&self, group_id: u64) -> bool {
        self.expanded
            .get(&group_id)
            .copied()
            .unwrap_or(self.config.expanded_by_default)
    }

    // -------------------------------------------------------------------------
    // Visual structure
    // -------------------------------------------------------------------------

    /// Returns the number of visual rows.
    pub fn len(&self) -> usize {
        (0..self.groups.len()).map(|stored| self.block_len(stored)).sum()
    }

    /// Returns `true` if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the row at `visual`, or `None` past the end.
    pub fn row_at(&self, visual: usize) -> Option<GroupRow<'_, G, I>> {
        let (stored, offset) = self.locate(visual)?;
        let group = self.groups.get(stored)?;
        let group_id = self.group_callback.group_id(group);

        if offset == self.header_offset(stored) {
            return Some(GroupRow::Header {
                group,
                expanded: self.is_group_expanded(group_id),
            });
        }

        let child = if self.config.children_above_group {
            offset
        } else {
            offset - 1
        };
        match self.item(group_id, child) {
            Some(item) => Some(GroupRow::Item { group, item }),
            None => Some(GroupRow::Empty { group }),
        }
    }

    /// Returns `true` if `visual` is a group header.
    pub fn is_group_position(&self, visual: usize) -> bool {
        matches!(self.row_at(visual), Some(GroupRow::Header { .. }))
    }

    /// Returns `true` if `visual` is an empty-group placeholder.
    pub fn is_empty_cell_position(&self, visual: usize) -> bool {
        matches!(self.row_at(visual), Some(GroupRow::Empty { .. }))
    }

    /// Returns the group owning the row at `visual`.
    pub fn group_at(&self, visual: usize) -> Option<&G> {
        self.row_at(visual).map(|row| row.group())
    }

    /// Returns the item shown at `visual`, if that row is an item.
    pub fn item_at(&self, visual: usize) -> Option<&I> {
        match self.row_at(visual)? {
            GroupRow::Item { item, .. } => Some(item),
            GroupRow::Header { .. } | GroupRow::Empty { .. } => None,
        }
    }

    /// Returns the header position of the group owning the row at `visual`.
    pub fn group_visual_position(&self, visual: usize) -> Option<usize> {
        self.locate(visual)
            .map(|(stored, _)| self.header_visual(stored))
    }

    /// Returns the header position of the group with `group_id`.
    pub fn group_position(&self, group_id: u64) -> Option<usize> {
        self.stored_position(group_id)
            .map(|stored| self.header_visual(stored))
    }

    /// Returns the visual position of an item.
    ///
    /// Items of collapsed groups have no visual position.
    pub fn item_visual_position(&self, item_id: u64) -> Option<usize> {
        let (group_id, index) = self.locate_item(item_id)?;
        let stored = self.stored_position(group_id)?;
        if !self.is_group_expanded(group_id) {
            return None;
        }
        Some(self.first_child_visual(stored) + index)
    }

    // -------------------------------------------------------------------------
    // Groups
    // -------------------------------------------------------------------------

    /// Inserts `group`, or replaces the group sharing its id.
    ///
    /// Returns the group's stored position.
    pub fn add_or_update_group(&mut self, group: G) -> usize {
        let group_id = self.group_callback.group_id(&group);

        let Some(old) = self.stored_position(group_id) else {
            let list = self.new_item_list(group.clone());
            self.items.insert(group_id, list);
            let stored = self.groups.upsert(group);
            self.group_changes.take();
            self.emit(ListChange::inserted(
                self.block_start(stored),
                self.block_len(stored),
            ));
            return stored;
        };

        let old_start = self.block_start(old);
        let old_header = self.header_visual(old);
        let len = self.block_len(old);

        // Item order may depend on the group; re-sort while the block is
        // still at its old position.
        let scope = group.clone();
        self.update_group_items(group_id, move |list| {
            list.callback_mut().group = scope;
            list.resort()
        });
        let stored = self.groups.upsert(group);

        for change in self.group_changes.take() {
            match change {
                ListChange::Changed { .. } => self.emit(ListChange::changed(old_header, 1)),
                ListChange::Moved { .. } => {
                    let new_start = self.block_start(stored);
                    if len == 1 {
                        self.emit(ListChange::moved(old_start, new_start));
                    } else {
                        self.emit(ListChange::removed(old_start, len));
                        self.emit(ListChange::inserted(new_start, len));
                    }
                }
                ListChange::Inserted { .. } | ListChange::Removed { .. } => {}
            }
        }
        stored
    }

    /// Inserts or replaces every group.
    pub fn add_or_update_groups<It>(&mut self, groups: It)
    where
        It: IntoIterator<Item = G>,
    {
        for group in groups {
            self.add_or_update_group(group);
        }
    }

    /// Removes a group together with its items.
    ///
    /// The group's expanded state is kept.
    pub fn remove_group(&mut self, group_id: u64) -> Option<G> {
        let stored = self.stored_position(group_id)?;
        let start = self.block_start(stored);
        let len = self.block_len(stored);

        self.items.remove(&group_id);
        let removed = self.groups.remove_at(stored);
        self.group_changes.take();

        tracing::debug!(target: targets::GROUP_LIST, group_id, rows = len, "group removed");
        self.emit(ListChange::removed(start, len));
        removed
    }

    // -------------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------------

    /// Inserts or replaces `item` in `group`, adding or updating the group
    /// first.
    ///
    /// An item whose id currently lives in another group is moved. Returns
    /// the item's position within the group.
    pub fn add_or_update_item(&mut self, group: G, item: I) -> usize {
        let group_id = self.group_callback.group_id(&group);
        self.add_or_update_group(group);
        self.take_from_other_group(group_id, &item);

        self.update_group_items(group_id, |list| list.upsert(item))
            .unwrap_or_default()
    }

    /// Inserts or replaces several items of `group` as one batch.
    pub fn add_or_update_items<It>(&mut self, group: G, items: It)
    where
        It: IntoIterator<Item = I>,
    {
        let items: Vec<I> = items.into_iter().collect();
        if items.is_empty() {
            return;
        }

        let _span = PerfSpan::new(span_names::GROUP_UPDATE);
        let group_id = self.group_callback.group_id(&group);
        self.add_or_update_group(group);
        for item in &items {
            self.take_from_other_group(group_id, item);
        }

        let count = items.len();
        self.update_group_items(group_id, |list| list.upsert_batch(items));
        tracing::debug!(target: targets::GROUP_LIST, group_id, count, "group items updated");
    }

    /// Removes the item sharing `item`'s id.
    ///
    /// With `remove_group_if_empty`, a group left without items is removed
    /// as well.
    pub fn remove_item(&mut self, item: &I, remove_group_if_empty: bool) -> Option<I> {
        let item_id = self.item_callback.item_id(item);
        let (group_id, index) = self.locate_item(item_id)?;
        let removed = self
            .update_group_items(group_id, |list| list.remove_at(index))
            .flatten();

        if remove_group_if_empty && self.group_item_count(group_id) == 0 {
            self.remove_group(group_id);
        }
        removed
    }

    /// Removes every group and item, emitting one removal of all rows.
    pub fn clear(&mut self) {
        let rows = self.len();
        self.groups.clear();
        self.items.clear();
        self.group_changes.take();
        self.item_changes.take();

        if rows > 0 {
            tracing::debug!(target: targets::GROUP_LIST, rows, "group list cleared");
            self.emit(ListChange::removed(0, rows));
        }
    }

    // -------------------------------------------------------------------------
    // Expand / collapse
    // -------------------------------------------------------------------------

    /// Shows a group's children.
    ///
    /// With `notify_header`, the header row is reported as changed first.
    /// Returns `false` if the group is unknown or already expanded.
    pub fn expand_group(&mut self, group_id: u64, notify_header: bool) -> bool {
        if self.is_group_expanded(group_id) {
            return false;
        }
        let Some(stored) = self.stored_position(group_id) else {
            return false;
        };

        if notify_header {
            self.emit(ListChange::changed(self.header_visual(stored), 1));
        }
        self.expanded.insert(group_id, true);

        let shown = self.children_shown(stored);
        if shown > 0 {
            self.emit(ListChange::inserted(self.first_child_visual(stored), shown));
        }
        tracing::debug!(target: targets::GROUP_LIST, group_id, rows = shown, "group expanded");
        true
    }

    /// Hides a group's children.
    ///
    /// With `notify_header`, the header row is reported as changed first.
    /// Returns `false` if the group is unknown, already collapsed, or
    /// collapsing is disallowed.
    pub fn collapse_group(&mut self, group_id: u64, notify_header: bool) -> bool {
        if self.config.disallow_collapse || !self.is_group_expanded(group_id) {
            return false;
        }
        let Some(stored) = self.stored_position(group_id) else {
            return false;
        };

        if notify_header {
            self.emit(ListChange::changed(self.header_visual(stored), 1));
        }

        let shown = self.children_shown(stored);
        if shown > 0 {
            self.emit(ListChange::removed(self.first_child_visual(stored), shown));
        }
        self.expanded.insert(group_id, false);
        tracing::debug!(target: targets::GROUP_LIST, group_id, rows = shown, "group collapsed");
        true
    }

    /// Collapses an expanded group or expands a collapsed one.
    pub fn toggle_group(&mut self, group_id: u64, notify_header: bool) -> bool {
        if self.is_group_expanded(group_id) {
            self.collapse_group(group_id, notify_header)
        } else {
            self.expand_group(group_id, notify_header)
        }
    }

    /// Expands every group, notifying each header.
    pub fn expand_all(&mut self) {
        for group_id in self.group_ids() {
            self.expand_group(group_id, true);
        }
    }

    /// Collapses every group, notifying each header.
    pub fn collapse_all(&mut self) {
        for group_id in self.group_ids() {
            self.collapse_group(group_id, true);
        }
    }

    /// Records expanded state without notifying.
    ///
    /// Meant for restoring state before groups are added. Does nothing when
    /// collapsing is disallowed.
    pub fn mark_expanded<It>(&mut self, group_ids: It, expanded: bool)
    where
        It: IntoIterator<Item = u64>,
    {
        if self.config.disallow_collapse {
            return;
        }
        for group_id in group_ids {
            self.expanded.insert(group_id, expanded);
        }
    }

    /// Forgets all recorded expanded state without notifying.
    pub fn clear_expanded(&mut self) {
        self.expanded.clear();
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn new_item_list(&self, group: G) -> ItemList<G, I, IC> {
        let list = SortedList::new(ScopedItemOrder {
            group,
            callback: self.item_callback.clone(),
        });
        self.item_changes.attach(list.signals());
        list
    }

    fn group_ids(&self) -> Vec<u64> {
        self.groups
            .iter()
            .map(|group| self.group_callback.group_id(group))
            .collect()
    }

    fn stored_position(&self, group_id: u64) -> Option<usize> {
        self.groups
            .iter()
            .position(|group| self.group_callback.group_id(group) == group_id)
    }

    /// Finds an item by id: `(group_id, stored index)`.
    fn locate_item(&self, item_id: u64) -> Option<(u64, usize)> {
        self.items.iter().find_map(|(&group_id, list)| {
            list.iter()
                .position(|item| self.item_callback.item_id(item) == item_id)
                .map(|index| (group_id, index))
        })
    }

    fn take_from_other_group(&mut self, group_id: u64, item: &I) {
        let item_id = self.item_callback.item_id(item);
        if let Some((current, index)) = self
            .locate_item(item_id)
            .filter(|&(current, _)| current != group_id)
        {
            self.update_group_items(current, |list| list.remove_at(index));
        }
    }

    /// Runs `f` on a group's items and reports the resulting changes in
    /// visual positions.
    fn update_group_items<R>(
        &mut self,
        group_id: u64,
        f: impl FnOnce(&mut ItemList<G, I, IC>) -> R,
    ) -> Option<R> {
        let list = self.items.get_mut(&group_id)?;
        let was_empty = list.is_empty();
        let result = f(list);
        let now_empty = list.is_empty();

        let changes = self.item_changes.take();
        if changes.is_empty() || !self.is_group_expanded(group_id) {
            return Some(result);
        }
        let Some(stored) = self.stored_position(group_id) else {
            return Some(result);
        };

        // Children never shift their own block, so one offset fits all.
        let base = self.first_child_visual(stored);
        let placeholder = self.config.display_empty_cell;
        if placeholder && was_empty {
            self.emit(ListChange::removed(base, 1));
        }
        for change in changes {
            self.emit(change.offset(base));
        }
        if placeholder && now_empty {
            self.emit(ListChange::inserted(base, 1));
        }
        Some(result)
    }

    /// Number of child rows the group currently shows.
    fn children_shown(&self, stored: usize) -> usize {
        let Some(group) = self.groups.get(stored) else {
            return 0;
        };
        let group_id = self.group_callback.group_id(group);
        if !self.is_group_expanded(group_id) {
            return 0;
        }
        match self.group_item_count(group_id) {
            0 if self.config.display_empty_cell => 1,
            count => count,
        }
    }

    fn block_len(&self, stored: usize) -> usize {
        1 + self.children_shown(stored)
    }

    fn block_start(&self, stored: usize) -> usize {
        (0..stored).map(|s| self.block_len(s)).sum()
    }

    fn header_offset(&self, stored: usize) -> usize {
        if self.config.children_above_group {
            self.children_shown(stored)
        } else {
            0
        }
    }

    fn header_visual(&self, stored: usize) -> usize {
        self.block_start(stored) + self.header_offset(stored)
    }

    fn first_child_visual(&self, stored: usize) -> usize {
        self.block_start(stored) + usize::from(!self.config.children_above_group)
    }

    /// Maps a visual position to `(stored group, offset within its block)`.
    fn locate(&self, visual: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for stored in 0..self.groups.len() {
            let len = self.block_len(stored);
            if visual < start + len {
                return Some((stored, visual - start));
            }
            start += len;
        }
        None
    }

    fn emit(&self, change: ListChange) {
        tracing::trace!(target: targets::GROUP_LIST, %change, "visual change");
        self.signals.emit(change);
    }
}

impl<G: fmt::Debug, I: fmt::Debug, GC, IC> fmt::Debug for GroupSortedList<G, I, GC, IC> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupSortedList")
            .field("groups", &self.groups)
            .field("expanded", &self.expanded)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: u64,
        key: &'static str,
    }

    fn e(id: u64, key: &'static str) -> Entry {
        Entry { id, key }
    }

    struct ByKey;

    impl GroupCallback<Entry> for ByKey {
        fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
            a.key.cmp(b.key)
        }

        fn are_contents_the_same(&self, old: &Entry, new: &Entry) -> bool {
            old == new
        }

        fn group_id(&self, group: &Entry) -> u64 {
            group.id
        }
    }

    impl ItemCallback<Entry, Entry> for ByKey {
        fn compare(&self, _group: &Entry, a: &Entry, b: &Entry) -> Ordering {
            a.key.cmp(b.key)
        }

        fn are_contents_the_same(&self, old: &Entry, new: &Entry) -> bool {
            old == new
        }

        fn item_id(&self, item: &Entry) -> u64 {
            item.id
        }
    }

    type EntryList = GroupSortedList<Entry, Entry, ByKey, ByKey>;

    fn expanded() -> GroupListConfig {
        GroupListConfig::default().with_expanded_by_default(true)
    }

    const KEYS: [&str; 5] = ["a", "b", "c", "d", "e"];

    fn new_list(config: GroupListConfig) -> (EntryList, Arc<Mutex<Vec<ListChange>>>) {
        let list = GroupSortedList::new(ByKey, ByKey, config);
        let events = Arc::new(Mutex::new(Vec::new()));
        let recv = events.clone();
        list.signals()
            .changes
            .connect(move |change| recv.lock().push(*change));
        (list, events)
    }

    /// Two groups (ids 100 and 200) with five items each (ids 0..5 and 5..10).
    fn two_full_groups(config: GroupListConfig) -> EntryList {
        let (mut list, _events) = new_list(config);
        list.add_or_update_items(
            e(100, "g0"),
            (0..5).map(|i| e(i, KEYS[i as usize])),
        );
        list.add_or_update_items(
            e(200, "g1"),
            (5..10).map(|i| e(i, KEYS[i as usize - 5])),
        );
        list
    }

    fn item_id_at(list: &EntryList, visual: usize) -> Option<u64> {
        list.item_at(visual).map(|item| item.id)
    }

    #[test]
    fn test_empty() {
        let (list, _events) = new_list(expanded());
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert!(list.row_at(0).is_none());
    }

    #[test]
    fn test_group_add() {
        let (mut list, events) = new_list(expanded());

        assert_eq!(list.add_or_update_group(e(0, "b")), 0);
        assert_eq!(list.add_or_update_group(e(1, "c")), 1);
        assert_eq!(list.add_or_update_group(e(2, "a")), 0);

        assert_eq!(list.len(), 3);
        assert_eq!(
            *events.lock(),
            vec![
                ListChange::inserted(0, 1),
                ListChange::inserted(1, 1),
                ListChange::inserted(0, 1),
            ]
        );
    }

    #[test]
    fn test_identical_group_update_is_silent() {
        let (mut list, events) = new_list(expanded());
        list.add_or_update_group(e(0, "a"));
        events.lock().clear();

        list.add_or_update_group(e(0, "a"));
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_item_add_to_group() {
        let (mut list, events) = new_list(expanded());
        let group = e(10, "g");

        assert_eq!(list.add_or_update_item(group.clone(), e(1, "b")), 0);
        assert_eq!(list.add_or_update_item(group.clone(), e(2, "c")), 1);
        assert_eq!(list.add_or_update_item(group, e(3, "a")), 0);

        assert_eq!(list.len(), 4);
        assert_eq!(
            *events.lock(),
            vec![
                ListChange::inserted(0, 1),
                ListChange::inserted(1, 1),
                ListChange::inserted(2, 1),
                ListChange::inserted(1, 1),
            ]
        );
    }

    #[test]
    fn test_visual_positions() {
        let list = two_full_groups(expanded());

        assert_eq!(list.len(), 12);
        assert_eq!(list.group_count(), 2);
        assert_eq!(list.group_item_count(100), 5);

        for visual in 0..6 {
            assert_eq!(list.group_visual_position(visual), Some(0));
        }
        for visual in 6..12 {
            assert_eq!(list.group_visual_position(visual), Some(6));
        }
        assert_eq!(list.group_visual_position(12), None);

        assert_eq!(item_id_at(&list, 1), Some(0));
        assert_eq!(item_id_at(&list, 5), Some(4));
        assert_eq!(item_id_at(&list, 7), Some(5));
        assert_eq!(item_id_at(&list, 11), Some(9));
        assert_eq!(item_id_at(&list, 6), None);

        assert!(list.is_group_position(0));
        assert!(!list.is_group_position(1));
        assert!(list.is_group_position(6));
        assert_eq!(list.group_at(8).map(|g| g.id), Some(200));

        assert_eq!(list.item_visual_position(0), Some(1));
        assert_eq!(list.item_visual_position(9), Some(11));
        assert_eq!(list.item_visual_position(999), None);
        assert_eq!(list.group_position(200), Some(6));
        assert_eq!(list.group_position(300), None);
    }

    #[test]
    fn test_stored_accessors() {
        let list = two_full_groups(expanded());

        assert_eq!(list.item(200, 1).map(|i| i.id), Some(6));
        assert!(list.item(200, 5).is_none());
        assert_eq!(list.items(100).len(), 5);
        assert!(list.items(999).is_empty());
        assert_eq!(list.stored_index_of_item(100, &e(3, "")), Some(3));
        assert_eq!(list.stored_index_of_item(200, &e(3, "")), None);
        assert_eq!(list.group(100).map(|g| g.key), Some("g0"));
        assert_eq!(list.groups().len(), 2);
    }

    #[test]
    fn test_children_above_group() {
        let config = expanded().with_children_above_group(true);
        let list = two_full_groups(config);

        assert_eq!(list.len(), 12);
        assert_eq!(list.group_position(100), Some(5));
        assert_eq!(list.group_position(200), Some(11));
        assert_eq!(item_id_at(&list, 0), Some(0));
        assert!(list.is_group_position(5));
        assert_eq!(item_id_at(&list, 6), Some(5));
        assert_eq!(list.item_visual_position(5), Some(6));
        assert_eq!(list.group_visual_position(0), Some(5));
        assert_eq!(list.group_visual_position(6), Some(11));
    }

    #[test]
    fn test_children_above_group_events() {
        let config = expanded().with_children_above_group(true);
        let (mut list, events) = new_list(config);

        list.add_or_update_item(e(10, "g"), e(1, "b"));
        list.add_or_update_item(e(10, "g"), e(2, "a"));

        assert!(list.is_group_position(2));
        assert_eq!(
            *events.lock(),
            vec![
                ListChange::inserted(0, 1),
                ListChange::inserted(0, 1),
                ListChange::inserted(0, 1),
            ]
        );
    }

    #[test]
    fn test_empty_cell() {
        let config = expanded().with_display_empty_cell(true);
        let (mut list, events) = new_list(config);

        list.add_or_update_group(e(10, "g"));
        assert_eq!(list.len(), 2);
        assert!(list.is_empty_cell_position(1));
        assert!(matches!(list.row_at(1), Some(GroupRow::Empty { .. })));

        list.add_or_update_item(e(10, "g"), e(1, "a"));
        assert_eq!(list.len(), 2);
        assert!(!list.is_empty_cell_position(1));

        assert_eq!(list.remove_item(&e(1, "a"), false).map(|i| i.id), Some(1));
        assert!(list.remove_item(&e(1, "a"), false).is_none());
        assert_eq!(list.group_count(), 1);
        assert!(list.is_empty_cell_position(1));

        assert_eq!(
            *events.lock(),
            vec![
                ListChange::inserted(0, 2),
                ListChange::removed(1, 1),
                ListChange::inserted(1, 1),
                ListChange::removed(1, 1),
                ListChange::inserted(1, 1),
            ]
        );
    }

    #[test]
    fn test_empty_cell_above_group() {
        let config = expanded()
            .with_display_empty_cell(true)
            .with_children_above_group(true);
        let (mut list, _events) = new_list(config);

        list.add_or_update_group(e(10, "g"));
        assert!(list.is_empty_cell_position(0));
        assert!(list.is_group_position(1));
    }

    #[test]
    fn test_expand_collapse() {
        let (mut list, events) = new_list(expanded());
        list.add_or_update_items(e(10, "g"), [e(1, "a"), e(2, "b"), e(3, "c")]);
        assert_eq!(list.len(), 4);
        events.lock().clear();

        assert!(list.collapse_group(10, false));
        assert!(!list.collapse_group(10, false));
        assert_eq!(list.len(), 1);
        assert_eq!(list.item_visual_position(1), None);

        assert!(list.expand_group(10, true));
        assert_eq!(list.len(), 4);

        assert!(list.toggle_group(10, false));
        assert!(!list.is_group_expanded(10));

        assert_eq!(
            *events.lock(),
            vec![
                ListChange::removed(1, 3),
                ListChange::changed(0, 1),
                ListChange::inserted(1, 3),
                ListChange::removed(1, 3),
            ]
        );
    }

    #[test]
    fn test_expand_collapse_all() {
        let mut list = two_full_groups(expanded());

        list.collapse_all();
        assert_eq!(list.len(), 2);
        list.expand_all();
        assert_eq!(list.len(), 12);
    }

    #[test]
    fn test_collapsed_by_default() {
        let (mut list, events) = new_list(GroupListConfig::default());
        assert!(!list.config().expanded_by_default);

        list.add_or_update_items(e(10, "g"), [e(1, "a"), e(2, "b")]);
        assert_eq!(list.len(), 1);
        assert_eq!(*events.lock(), vec![ListChange::inserted(0, 1)]);

        assert!(list.expand_group(10, false));
        assert_eq!(list.len(), 3);
        assert_eq!(events.lock().last(), Some(&ListChange::inserted(1, 2)));
    }

    #[test]
    fn test_disallow_collapse() {
        let config = expanded().with_disallow_collapse(true);
        let (mut list, events) = new_list(config);
        list.add_or_update_item(e(10, "g"), e(1, "a"));
        events.lock().clear();

        assert!(!list.collapse_group(10, true));
        list.mark_expanded([10], false);
        assert!(list.is_group_expanded(10));
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_mark_expanded_is_state_only() {
        let (mut list, events) = new_list(expanded());
        list.add_or_update_item(e(10, "g"), e(1, "a"));
        events.lock().clear();

        list.mark_expanded([10], false);
        assert!(!list.is_group_expanded(10));
        assert_eq!(list.len(), 1);

        list.clear_expanded();
        assert!(list.is_group_expanded(10));
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_group_move_moves_block() {
        let (mut list, events) = new_list(expanded());
        list.add_or_update_items(e(1, "a"), [e(11, "x"), e(12, "y")]);
        list.add_or_update_items(e(2, "b"), [e(21, "x"), e(22, "y")]);
        events.lock().clear();

        assert_eq!(list.add_or_update_group(e(1, "c")), 1);

        assert_eq!(list.group_position(2), Some(0));
        assert_eq!(list.group_position(1), Some(3));
        assert_eq!(item_id_at(&list, 4), Some(11));
        assert_eq!(
            *events.lock(),
            vec![
                ListChange::changed(0, 1),
                ListChange::removed(0, 3),
                ListChange::inserted(3, 3),
            ]
        );
    }

    #[test]
    fn test_collapsed_group_move_is_single_move() {
        let (mut list, events) = new_list(expanded());
        list.add_or_update_items(e(1, "a"), [e(11, "x")]);
        list.add_or_update_items(e(2, "b"), [e(21, "x")]);
        list.collapse_all();
        events.lock().clear();

        list.add_or_update_group(e(1, "c"));
        assert_eq!(
            *events.lock(),
            vec![ListChange::changed(0, 1), ListChange::moved(0, 1)]
        );
    }

    /// Items sort ascending in groups keyed "asc" and descending otherwise.
    struct Directed;

    impl GroupCallback<Entry> for Directed {
        fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
            a.id.cmp(&b.id)
        }

        fn are_contents_the_same(&self, old: &Entry, new: &Entry) -> bool {
            old == new
        }

        fn group_id(&self, group: &Entry) -> u64 {
            group.id
        }
    }

    impl ItemCallback<Entry, Entry> for Directed {
        fn compare(&self, group: &Entry, a: &Entry, b: &Entry) -> Ordering {
            let order = a.key.cmp(b.key);
            if group.key == "asc" {
                order
            } else {
                order.reverse()
            }
        }

        fn are_contents_the_same(&self, old: &Entry, new: &Entry) -> bool {
            old == new
        }

        fn item_id(&self, item: &Entry) -> u64 {
            item.id
        }
    }

    #[test]
    fn test_group_update_resorts_items() {
        let mut list = GroupSortedList::new(Directed, Directed, expanded());
        list.add_or_update_items(e(10, "asc"), [e(1, "a"), e(2, "b"), e(3, "c")]);
        let events = Arc::new(Mutex::new(Vec::new()));
        let recv = events.clone();
        list.signals()
            .changes
            .connect(move |change| recv.lock().push(*change));

        list.add_or_update_group(e(10, "desc"));

        let keys: Vec<&str> = list.items(10).iter().map(|item| item.key).collect();
        assert_eq!(keys, vec!["c", "b", "a"]);
        assert_eq!(
            *events.lock(),
            vec![
                ListChange::moved(3, 1),
                ListChange::moved(3, 2),
                ListChange::changed(0, 1),
            ]
        );

        list.add_or_update_item(e(10, "desc"), e(4, "bb"));
        let keys: Vec<&str> = list.items(10).iter().map(|item| item.key).collect();
        assert_eq!(keys, vec!["c", "bb", "b", "a"]);
        assert_eq!(list.item_visual_position(4), Some(2));
    }

    #[test]
    fn test_item_changes_group() {
        let (mut list, events) = new_list(expanded());
        list.add_or_update_item(e(1, "a"), e(7, "x"));
        list.add_or_update_group(e(2, "b"));
        events.lock().clear();

        assert_eq!(list.add_or_update_item(e(2, "b"), e(7, "x")), 0);

        assert!(list.items(1).is_empty());
        assert_eq!(list.items(2).len(), 1);
        assert_eq!(list.item_visual_position(7), Some(2));
        assert_eq!(
            *events.lock(),
            vec![ListChange::removed(1, 1), ListChange::inserted(2, 1)]
        );
    }

    #[test]
    fn test_item_update_within_group() {
        let (mut list, events) = new_list(expanded());
        list.add_or_update_items(e(10, "g"), [e(1, "a"), e(2, "b")]);
        events.lock().clear();

        assert_eq!(list.add_or_update_item(e(10, "g"), e(1, "c")), 1);
        assert_eq!(
            *events.lock(),
            vec![ListChange::changed(1, 1), ListChange::moved(1, 2)]
        );
    }

    #[test]
    fn test_remove_item_removes_empty_group() {
        let (mut list, events) = new_list(expanded());
        list.add_or_update_item(e(10, "g"), e(1, "a"));
        events.lock().clear();

        assert!(list.remove_item(&e(1, "a"), true).is_some());
        assert_eq!(list.group_count(), 0);
        assert_eq!(
            *events.lock(),
            vec![ListChange::removed(1, 1), ListChange::removed(0, 1)]
        );
    }

    #[test]
    fn test_remove_group() {
        let mut list = two_full_groups(expanded());
        let events = Arc::new(Mutex::new(Vec::new()));
        let recv = events.clone();
        list.signals()
            .changes
            .connect(move |change| recv.lock().push(*change));

        assert_eq!(list.remove_group(100).map(|g| g.id), Some(100));
        assert!(list.remove_group(100).is_none());
        assert_eq!(list.len(), 6);
        assert_eq!(list.item_visual_position(0), None);
        assert_eq!(*events.lock(), vec![ListChange::removed(0, 6)]);
    }

    #[test]
    fn test_clear() {
        let mut list = two_full_groups(expanded());
        let events = Arc::new(Mutex::new(Vec::new()));
        let recv = events.clone();
        list.signals()
            .changes
            .connect(move |change| recv.lock().push(*change));

        list.clear();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(*events.lock(), vec![ListChange::removed(0, 12)]);
    }
}
