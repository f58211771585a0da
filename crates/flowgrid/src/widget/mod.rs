//! Widget layer: windowing engine, cells, skin, and the public facade.

pub mod animation;
mod cell;
mod list_view;
mod skin;
mod virtual_flow;
mod visual;

pub use cell::{CellFactory, DefaultCellFactory, EditEvent, GridCell};
pub use list_view::GridListView;
pub use skin::{GridListSkin, SkinFace};
pub use virtual_flow::VirtualFlow;
pub use visual::{TextVisual, Visual};
