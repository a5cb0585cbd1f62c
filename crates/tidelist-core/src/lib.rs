//! Core systems for tidelist.
//!
//! This crate provides the foundational pieces shared by the tidelist list
//! models:
//!
//! - **Signal/Slot System**: Type-safe, synchronous change notification
//! - **Logging**: `tracing` targets, span names and a performance span guard
//!
//! # Signal/Slot Example
//!
//! ```
//! use tidelist_core::Signal;
//!
//! // Create a signal that notifies when rows are removed
//! let rows_removed = Signal::<(usize, usize)>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = rows_removed.connect(|(position, count)| {
//!     println!("removed {count} row(s) at {position}");
//! });
//!
//! // Emit the signal
//! rows_removed.emit((4, 1));
//!
//! // Disconnect when done
//! rows_removed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
