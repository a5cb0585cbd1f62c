//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fmt::Debug;

use tidelist::model::ListChange;

/// A view-side copy of a list driven only by change notifications.
///
/// Inserted and changed rows are unknown until the next
/// [`check_and_rebind`](Mirror::check_and_rebind), just like rows a real view
/// would have to rebind. Rows that were never invalidated must still match the
/// source, which catches missing `changed` notifications as well as wrong
/// positions.
#[derive(Debug, Default)]
pub struct Mirror<V> {
    rows: Vec<Option<V>>,
}

impl<V: Clone + PartialEq + Debug> Mirror<V> {
    /// Creates a mirror already in sync with `rows`.
    pub fn new(rows: &[V]) -> Self {
        Self {
            rows: rows.iter().cloned().map(Some).collect(),
        }
    }

    /// Returns the number of mirrored rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Applies one change, panicking if it does not fit the mirror.
    pub fn apply(&mut self, change: ListChange) {
        let len = self.rows.len();
        match change {
            ListChange::Inserted { position, count } => {
                assert!(position <= len, "{change} past end of {len} rows");
                self.rows
                    .splice(position..position, std::iter::repeat_n(None, count));
            }
            ListChange::Removed { position, count } => {
                assert!(position + count <= len, "{change} past end of {len} rows");
                self.rows.drain(position..position + count);
            }
            ListChange::Moved { from, to } => {
                assert!(from < len && to < len, "{change} past end of {len} rows");
                let row = self.rows.remove(from);
                self.rows.insert(to, row);
            }
            ListChange::Changed { position, count } => {
                assert!(position + count <= len, "{change} past end of {len} rows");
                for row in &mut self.rows[position..position + count] {
                    *row = None;
                }
            }
        }
    }

    /// Applies every change in order.
    pub fn apply_all(&mut self, changes: impl IntoIterator<Item = ListChange>) {
        for change in changes {
            self.apply(change);
        }
    }

    /// Compares the mirror with `actual`, then rebinds every row.
    pub fn check_and_rebind(&mut self, actual: &[V]) -> Result<(), String> {
        if self.rows.len() != actual.len() {
            return Err(format!(
                "mirror has {} rows, source has {}",
                self.rows.len(),
                actual.len()
            ));
        }
        for (position, (mirrored, real)) in self.rows.iter().zip(actual).enumerate() {
            if let Some(mirrored) = mirrored {
                if mirrored != real {
                    return Err(format!(
                        "stale row at {position}: mirror {mirrored:?}, source {real:?}"
                    ));
                }
            }
        }
        self.rows = actual.iter().cloned().map(Some).collect();
        Ok(())
    }
}
