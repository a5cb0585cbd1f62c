//! Ordering and identity policies for sorted lists.
//!
//! A [`SortedList`](super::SortedList) never inspects its items directly. It
//! asks a [`SortCallback`] three questions:
//!
//! - where does an item go (`compare`)
//! - is this the same logical row (`are_items_the_same`)
//! - did the displayed data change (`are_contents_the_same`)
//!
//! Two ready-made implementations cover the common cases: [`FnSortCallback`]
//! holds three closures, and [`KeyedSortCallback`] derives identity from a key
//! extractor and content equality from `PartialEq`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Policy hooks used by [`SortedList`](super::SortedList).
///
/// `compare` must be a total order. Identity and order are independent: two
/// items may compare `Equal` without being the same row, and the same row may
/// compare differently after its content changes.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use tidelist::model::SortCallback;
///
/// struct Assignment {
///     id: u64,
///     due: u32,
///     title: String,
/// }
///
/// struct ByDueDate;
///
/// impl SortCallback<Assignment> for ByDueDate {
///     fn compare(&self, a: &Assignment, b: &Assignment) -> Ordering {
///         a.due.cmp(&b.due)
///     }
///
///     fn are_items_the_same(&self, a: &Assignment, b: &Assignment) -> bool {
///         a.id == b.id
///     }
///
///     fn are_contents_the_same(&self, old: &Assignment, new: &Assignment) -> bool {
///         old.due == new.due && old.title == new.title
///     }
/// }
/// ```
pub trait SortCallback<T> {
    /// Total order used to position items.
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// Returns `true` if both values represent the same logical row.
    fn are_items_the_same(&self, a: &T, b: &T) -> bool;

    /// Returns `true` if the displayed data of `old` and `new` is identical.
    ///
    /// Only called for items that are the same row.
    fn are_contents_the_same(&self, old: &T, new: &T) -> bool;
}

impl<T, C: SortCallback<T> + ?Sized> SortCallback<T> for Arc<C> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (**self).compare(a, b)
    }

    fn are_items_the_same(&self, a: &T, b: &T) -> bool {
        (**self).are_items_the_same(a, b)
    }

    fn are_contents_the_same(&self, old: &T, new: &T) -> bool {
        (**self).are_contents_the_same(old, new)
    }
}

/// Type alias for a comparator closure.
pub type CompareFn<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Type alias for an identity or content predicate closure.
pub type SameFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// A [`SortCallback`] assembled from three closures.
///
/// ```
/// use tidelist::model::{FnSortCallback, SortedList};
///
/// let callback = FnSortCallback::new(
///     |a: &(u64, String), b: &(u64, String)| a.1.cmp(&b.1),
///     |a, b| a.0 == b.0,
///     |a, b| a == b,
/// );
/// let mut list = SortedList::new(callback);
/// list.upsert((1, "b".to_string()));
/// list.upsert((2, "a".to_string()));
/// assert_eq!(list[0].1, "a");
/// ```
pub struct FnSortCallback<T> {
    compare: CompareFn<T>,
    same_item: SameFn<T>,
    same_content: SameFn<T>,
}

impl<T> FnSortCallback<T> {
    /// Creates a callback from a comparator, an identity predicate and a
    /// content predicate.
    pub fn new<C, I, S>(compare: C, same_item: I, same_content: S) -> Self
    where
        C: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
        I: Fn(&T, &T) -> bool + Send + Sync + 'static,
        S: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self {
            compare: Arc::new(compare),
            same_item: Arc::new(same_item),
            same_content: Arc::new(same_content),
        }
    }
}

impl<T> Clone for FnSortCallback<T> {
    fn clone(&self) -> Self {
        Self {
            compare: self.compare.clone(),
            same_item: self.same_item.clone(),
            same_content: self.same_content.clone(),
        }
    }
}

impl<T> fmt::Debug for FnSortCallback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSortCallback").finish_non_exhaustive()
    }
}

impl<T> SortCallback<T> for FnSortCallback<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.compare)(a, b)
    }

    fn are_items_the_same(&self, a: &T, b: &T) -> bool {
        (self.same_item)(a, b)
    }

    fn are_contents_the_same(&self, old: &T, new: &T) -> bool {
        (self.same_content)(old, new)
    }
}

/// A [`SortCallback`] whose identity is a key extracted from each item.
///
/// Contents are compared with `PartialEq`, so every field that matters for
/// display should participate in the item's equality.
///
/// ```
/// use tidelist::model::{KeyedSortCallback, SortedList};
///
/// #[derive(Clone, PartialEq)]
/// struct Course {
///     id: u64,
///     name: String,
/// }
///
/// let callback = KeyedSortCallback::new(|c: &Course| c.id, |a, b| a.name.cmp(&b.name));
/// let mut list = SortedList::new(callback);
/// list.upsert(Course { id: 7, name: "Biology".into() });
/// assert_eq!(list.len(), 1);
/// ```
pub struct KeyedSortCallback<T, K> {
    key: Arc<dyn Fn(&T) -> K + Send + Sync>,
    compare: CompareFn<T>,
}

impl<T, K> KeyedSortCallback<T, K> {
    /// Creates a callback from a key extractor and a comparator.
    pub fn new<F, C>(key: F, compare: C) -> Self
    where
        F: Fn(&T) -> K + Send + Sync + 'static,
        C: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self {
            key: Arc::new(key),
            compare: Arc::new(compare),
        }
    }

    /// Returns the identity key of `item`.
    pub fn key_of(&self, item: &T) -> K {
        (self.key)(item)
    }
}

impl<T, K> Clone for KeyedSortCallback<T, K> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            compare: self.compare.clone(),
        }
    }
}

impl<T, K> fmt::Debug for KeyedSortCallback<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedSortCallback").finish_non_exhaustive()
    }
}

impl<T: PartialEq, K: PartialEq> SortCallback<T> for KeyedSortCallback<T, K> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.compare)(a, b)
    }

    fn are_items_the_same(&self, a: &T, b: &T) -> bool {
        (self.key)(a) == (self.key)(b)
    }

    fn are_contents_the_same(&self, old: &T, new: &T) -> bool {
        old == new
    }
}
