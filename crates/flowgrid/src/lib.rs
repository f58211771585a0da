//! A virtualized, grid-wrapping list widget.
//!
//! FlowGrid renders only the cells currently within (or near) the viewport of
//! a potentially large item collection, recycles cell objects as the viewport
//! scrolls or resizes, and keeps selection state synchronized between user
//! interaction and programmatic control.
//!
//! # Layers
//!
//! - [`model`] — the observable [`ItemList`](model::ItemList) backing
//!   collection and the [`SelectionModel`](model::SelectionModel).
//! - [`widget`] — the [`VirtualFlow`](widget::VirtualFlow) windowing engine,
//!   [`GridCell`](widget::GridCell) with its edit lifecycle, the
//!   [`GridListSkin`](widget::GridListSkin) placeholder swap, and the
//!   [`GridListView`](widget::GridListView) facade.
//!
//! # Example
//!
//! ```
//! use flowgrid::{GridListView, SelectionMode};
//! use flowgrid::core::Size;
//!
//! let view = GridListView::<String>::new();
//! view.items().set_items(vec!["alpha".into(), "beta".into(), "gamma".into()]);
//! view.resize(Size::new(640.0, 480.0));
//!
//! view.set_selection_mode(SelectionMode::Multiple);
//! view.select("alpha".to_string());
//! view.select("beta".to_string());
//! assert_eq!(view.selected_items().len(), 2);
//! ```

pub mod model;
pub mod widget;

/// Re-export of the foundation crate.
pub use flowgrid_core as core;

pub use model::{ItemList, ListSignals, SelectionMode, SelectionModel};
pub use widget::{
    CellFactory, DefaultCellFactory, EditEvent, GridCell, GridListSkin, GridListView, SkinFace,
    TextVisual, VirtualFlow, Visual,
};
