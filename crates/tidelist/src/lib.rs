//! tidelist - always-sorted lists that report minimal positional changes.
//!
//! Feed a list unsorted, repeated or partially updated data and it keeps
//! itself ordered and identity-unique, telling listeners exactly which rows
//! were inserted, removed, moved or changed.
//!
//! # Example
//!
//! ```
//! use tidelist::model::{KeyedSortCallback, ListChange, SortedList};
//!
//! #[derive(Clone, PartialEq)]
//! struct Row {
//!     id: u64,
//!     key: &'static str,
//! }
//!
//! let mut list = SortedList::new(KeyedSortCallback::new(|r: &Row| r.id, |a, b| a.key.cmp(b.key)));
//! let recorder = tidelist::model::ChangeRecorder::new();
//! recorder.attach(list.signals());
//!
//! list.upsert_batch([
//!     Row { id: 3, key: "c" },
//!     Row { id: 1, key: "a" },
//!     Row { id: 2, key: "b" },
//! ]);
//! assert_eq!(recorder.take(), vec![ListChange::inserted(0, 3)]);
//!
//! list.upsert(Row { id: 1, key: "z" });
//! assert_eq!(
//!     recorder.take(),
//!     vec![ListChange::changed(0, 1), ListChange::moved(0, 2)]
//! );
//! ```

pub mod config;
pub mod error;
pub mod model;

pub use config::{GroupListConfig, ListConfig, TidelistConfig};
pub use error::{Error, Result};
pub use tidelist_core::{ConnectionGuard, ConnectionId, Signal};
