//! Adapter between a [`SortedList`] and a display layer.
//!
//! `ListAdapter` owns a sorted list and forwards its changes to an observer
//! while one is attached. It also manages the trailing "loading" row that
//! paginated views show one index past the last item.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tidelist_core::logging::targets;
use tidelist_core::ConnectionId;

use super::callback::SortCallback;
use super::change::ListChange;
use super::sorted_list::SortedList;

/// Receives the changes forwarded by a [`ListAdapter`].
pub trait ListObserver: Send + Sync {
    /// Called once per change, in emission order.
    fn on_change(&self, change: ListChange);
}

impl<F> ListObserver for F
where
    F: Fn(ListChange) + Send + Sync,
{
    fn on_change(&self, change: ListChange) {
        self(change)
    }
}

/// Display-layer collaborator that renders rows.
pub trait ItemBinder<T> {
    /// Binds the item shown at `position`.
    fn bind_item(&mut self, position: usize, item: &T);

    /// Binds the loading footer shown at `position`.
    ///
    /// The default does nothing.
    fn bind_loading_footer(&mut self, _position: usize) {}
}

/// A row as seen by the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row<'a, T> {
    /// A list item.
    Item(&'a T),
    /// The trailing loading indicator.
    LoadingFooter,
}

type ObserverSlot = Arc<Mutex<Option<Arc<dyn ListObserver>>>>;

/// Forwards a [`SortedList`]'s changes to an attachable observer.
///
/// The list's lifetime is independent from any observer: `attach` and
/// `detach` only decide whether changes are forwarded.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use parking_lot::Mutex;
/// use tidelist::model::{KeyedSortCallback, ListAdapter, ListChange, SortedList};
///
/// let list = SortedList::new(KeyedSortCallback::new(|n: &u32| *n, |a, b| a.cmp(b)));
/// let mut adapter = ListAdapter::new(list);
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
/// adapter.attach(move |change: ListChange| sink.lock().push(change));
///
/// adapter.upsert(5);
/// adapter.set_loading(true);
/// assert_eq!(adapter.row_count(), 2);
/// assert_eq!(
///     *seen.lock(),
///     vec![ListChange::inserted(0, 1), ListChange::inserted(1, 1)]
/// );
/// ```
pub struct ListAdapter<T, C> {
    list: SortedList<T, C>,
    observer: ObserverSlot,
    forwarding: ConnectionId,
    loading: bool,
}

impl<T, C: SortCallback<T>> ListAdapter<T, C> {
    /// Wraps `list`. No observer is attached yet.
    pub fn new(list: SortedList<T, C>) -> Self {
        let observer: ObserverSlot = Arc::new(Mutex::new(None));
        let slot = observer.clone();
        let forwarding = list.signals().changes.connect(move |change| {
            if let Some(observer) = slot.lock().as_ref() {
                observer.on_change(*change);
            }
        });

        Self {
            list,
            observer,
            forwarding,
            loading: false,
        }
    }

    /// Starts forwarding changes to `observer`, replacing any previous one.
    pub fn attach<O>(&mut self, observer: O)
    where
        O: ListObserver + 'static,
    {
        self.attach_shared(Arc::new(observer));
    }

    /// Starts forwarding changes to a shared observer.
    pub fn attach_shared(&mut self, observer: Arc<dyn ListObserver>) {
        tracing::debug!(target: targets::ADAPTER, "observer attached");
        *self.observer.lock() = Some(observer);
    }

    /// Stops forwarding changes and returns the detached observer.
    pub fn detach(&mut self) -> Option<Arc<dyn ListObserver>> {
        let previous = self.observer.lock().take();
        if previous.is_some() {
            tracing::debug!(target: targets::ADAPTER, "observer detached");
        }
        previous
    }

    /// Returns `true` if an observer is attached.
    pub fn is_attached(&self) -> bool {
        self.observer.lock().is_some()
    }

    /// Returns the underlying list.
    pub fn list(&self) -> &SortedList<T, C> {
        &self.list
    }

    /// Returns the underlying list for mutation.
    ///
    /// Changes made through it are forwarded like any other.
    pub fn list_mut(&mut self) -> &mut SortedList<T, C> {
        &mut self.list
    }

    // -------------------------------------------------------------------------
    // Loading footer
    // -------------------------------------------------------------------------

    /// Shows or hides the trailing loading row.
    pub fn set_loading(&mut self, loading: bool) {
        if self.loading == loading {
            return;
        }
        self.loading = loading;
        let position = self.list.len();
        let change = if loading {
            ListChange::inserted(position, 1)
        } else {
            ListChange::removed(position, 1)
        };
        self.forward(change);
    }

    /// Returns `true` while the loading row is shown.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns `true` if `position` is the loading row.
    pub fn is_loading_footer(&self, position: usize) -> bool {
        self.loading && position == self.list.len()
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Returns the number of rows, including the loading row.
    pub fn row_count(&self) -> usize {
        self.list.len() + usize::from(self.loading)
    }

    /// Returns the row at `position`, or `None` past the last row.
    pub fn row(&self, position: usize) -> Option<Row<'_, T>> {
        match self.list.get(position) {
            Some(item) => Some(Row::Item(item)),
            None if self.is_loading_footer(position) => Some(Row::LoadingFooter),
            None => None,
        }
    }

    /// Binds the row at `position` through `binder`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= row_count()`.
    pub fn bind<B>(&self, position: usize, binder: &mut B)
    where
        B: ItemBinder<T> + ?Sized,
    {
        match self.row(position) {
            Some(Row::Item(item)) => binder.bind_item(position, item),
            Some(Row::LoadingFooter) => binder.bind_loading_footer(position),
            None => panic!(
                "ListAdapter bind out of range: position {position}, row count {}",
                self.row_count()
            ),
        }
    }

    // -------------------------------------------------------------------------
    // Passthroughs
    // -------------------------------------------------------------------------

    /// See [`SortedList::upsert`].
    pub fn upsert(&mut self, item: T) -> usize {
        self.list.upsert(item)
    }

    /// See [`SortedList::upsert_batch`].
    pub fn upsert_batch<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.list.upsert_batch(items)
    }

    /// See [`SortedList::remove`].
    pub fn remove(&mut self, item: &T) -> Option<T> {
        self.list.remove(item)
    }

    /// See [`SortedList::clear`].
    pub fn clear(&mut self) {
        self.list.clear()
    }

    fn forward(&self, change: ListChange) {
        if let Some(observer) = self.observer.lock().as_ref() {
            observer.on_change(change);
        }
    }
}

impl<T, C> Drop for ListAdapter<T, C> {
    fn drop(&mut self) {
        self.list.signals().changes.disconnect(self.forwarding);
    }
}

impl<T: fmt::Debug, C> fmt::Debug for ListAdapter<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListAdapter")
            .field("list", &self.list)
            .field("attached", &self.observer.lock().is_some())
            .field("loading", &self.loading)
            .finish()
    }
}
