//! Logging facilities for tidelist.
//!
//! tidelist uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the host application installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("tidelist::model=debug")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every event is emitted under one of the [`targets`], so subsystems can be
//! filtered independently. [`PerfSpan`] wraps operations whose cost grows with
//! list size (batch flushes, full refreshes) for profiling.

/// Span names used throughout tidelist for tracing.
pub mod span_names {
    /// Batch flush span.
    pub const BATCH_FLUSH: &str = "tidelist::batch_flush";
    /// Full data-source refresh span.
    pub const REPLACE_ALL: &str = "tidelist::replace_all";
    /// Grouped list bulk update span.
    pub const GROUP_UPDATE: &str = "tidelist::group_update";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "tidelist_core::signal";
    /// Sorted list target.
    pub const SORTED_LIST: &str = "tidelist::model::sorted_list";
    /// Grouped list target.
    pub const GROUP_LIST: &str = "tidelist::model::group_list";
    /// List adapter target.
    pub const ADAPTER: &str = "tidelist::model::adapter";
    /// Configuration loading target.
    pub const CONFIG: &str = "tidelist::config";
    /// Performance spans target.
    pub const PERF: &str = "tidelist::perf";
}

/// A guard that records the duration of an operation as a tracing span.
///
/// The span stays entered until the guard is dropped.
///
/// ```
/// use tidelist_core::PerfSpan;
/// use tidelist_core::logging::span_names;
///
/// {
///     let _span = PerfSpan::new(span_names::BATCH_FLUSH);
///     // ... measured work ...
/// }
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
