//! Data models backing the widget.
//!
//! This module contains the observable item collection ([`ItemList`]) and the
//! selection state ([`SelectionModel`]). Both are independent of rendering;
//! the widget layer subscribes to their signals.

mod item_list;
mod selection;

pub use item_list::{ItemList, ListSignals};
pub use selection::{SelectionMode, SelectionModel};
