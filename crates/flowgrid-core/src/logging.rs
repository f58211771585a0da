//! Logging facilities for FlowGrid.
//!
//! FlowGrid uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     // Initialize tracing (you can customize this)
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Each subsystem logs under its own target (see [`targets`]), so directives
//! like `flowgrid::flow=trace` narrow output to a single subsystem.

/// Span names used throughout FlowGrid for tracing.
///
/// These constants identify the operations wrapped in a [`PerfSpan`].
pub mod span_names {
    /// Windowing recompute span.
    pub const UPDATE_CELLS: &str = "flowgrid::update_cells";
    /// Full view reset span.
    pub const RESET: &str = "flowgrid::reset";
}

/// A guard that scopes a tracing span to an operation.
///
/// The span stays active until the guard is dropped, so wrapping an
/// operation in one records its duration.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span, active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::trace_span!(target: "flowgrid::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "flowgrid_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "flowgrid_core::signal";
    /// Item collection target.
    pub const MODEL: &str = "flowgrid::model";
    /// Selection model target.
    pub const SELECTION: &str = "flowgrid::selection";
    /// Windowing engine target.
    pub const FLOW: &str = "flowgrid::flow";
    /// Cell and edit lifecycle target.
    pub const CELL: &str = "flowgrid::cell";
    /// Container skin target.
    pub const SKIN: &str = "flowgrid::skin";
}
