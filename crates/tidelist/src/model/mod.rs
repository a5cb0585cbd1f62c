//! Sorted list models and their change notifications.
//!
//! This module provides lists that stay sorted while items are added,
//! updated and removed, and that describe every mutation as positional
//! changes a view can animate:
//!
//! - Rows are only rebound when their displayed data changed
//! - Rows keep their identity across updates, so moves animate as moves
//! - Bulk loads coalesce into a handful of range notifications
//!
//! # Core Types
//!
//! - `SortCallback`: Ordering, identity and content-equality policy
//! - `ListChange`: A single positional change
//! - `ListSignals`: Signals carrying changes to listeners
//!
//! # Model Implementations
//!
//! - `SortedList`: Flat, always-sorted, identity-unique list
//! - `ListAdapter`: Forwards a list's changes to an attachable observer and
//!   adds a trailing loading row
//! - `GroupSortedList`: Sorted groups of sorted items flattened into visual
//!   rows, with expandable groups
//!
//! # Example
//!
//! ```
//! use tidelist::model::{KeyedSortCallback, SortedList};
//!
//! #[derive(Clone, PartialEq)]
//! struct Announcement {
//!     id: u64,
//!     posted_at: u64,
//! }
//!
//! // Newest first, identified by id
//! let mut list = SortedList::new(KeyedSortCallback::new(
//!     |a: &Announcement| a.id,
//!     |a, b| b.posted_at.cmp(&a.posted_at),
//! ));
//!
//! list.signals().inserted.connect(|(position, count)| {
//!     println!("inserted {count} row(s) at {position}");
//! });
//!
//! list.upsert(Announcement { id: 1, posted_at: 100 });
//! list.upsert(Announcement { id: 2, posted_at: 200 });
//! assert_eq!(list[0].id, 2);
//! ```
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌──────────────┐
//! │  SortedList  │────>│ ListSignals │────>│ ListAdapter  │──> observer
//! │ (callback C) │     │             │     │              │
//! └──────────────┘     └─────────────┘     └──────────────┘
//!        ^
//!        │ one per group, positions translated to visual rows
//! ┌──────────────────┐
//! │ GroupSortedList  │──> ListSignals (visual)
//! └──────────────────┘
//! ```

mod adapter;
mod callback;
mod change;
mod group_list;
mod sorted_list;

pub use adapter::{ItemBinder, ListAdapter, ListObserver, Row};
pub use callback::{CompareFn, FnSortCallback, KeyedSortCallback, SameFn, SortCallback};
pub use change::{ChangeRecorder, ListChange, ListSignals};
pub use group_list::{GroupCallback, GroupRow, GroupSortedList, ItemCallback};
pub use sorted_list::{BatchUpdate, SortedList};
