//! The public list widget.
//!
//! `GridListView` is a pure forwarding facade over the windowing engine and
//! its skin: every configuration and state accessor delegates, so facade
//! state equals engine state at all times.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use flowgrid_core::{Signal, Size};
use static_assertions::assert_impl_all;

use super::cell::{CellFactory, EditEvent, GridCell};
use super::skin::{GridListSkin, SkinFace};
use super::virtual_flow::VirtualFlow;
use super::visual::Visual;
use crate::model::{ItemList, SelectionMode, SelectionModel};

/// A virtualized, grid-wrapping list widget.
///
/// # Example
///
/// ```
/// use flowgrid::GridListView;
/// use flowgrid::core::Size;
///
/// let view = GridListView::<String>::new();
/// view.items().set_items(vec!["a".into(), "b".into(), "c".into()]);
/// view.resize(Size::new(640.0, 480.0));
/// view.select("b".to_string());
/// assert!(view.selection().is_selected(&"b".to_string()));
/// ```
pub struct GridListView<T>
where
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    flow: Arc<VirtualFlow<T>>,
    skin: Arc<GridListSkin<T>>,
}

impl<T> GridListView<T>
where
    T: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static,
{
    /// Creates a widget using the built-in text cell factory.
    pub fn new() -> Self {
        Self::from_flow(VirtualFlow::new())
    }
}

impl<T> Default for GridListView<T>
where
    T: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GridListView<T>
where
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    /// Creates a widget with a custom cell factory.
    pub fn with_factory(factory: Arc<dyn CellFactory<T>>) -> Self {
        Self::from_flow(VirtualFlow::with_factory(factory))
    }

    fn from_flow(flow: Arc<VirtualFlow<T>>) -> Self {
        let skin = GridListSkin::new(Arc::clone(&flow));
        Self { flow, skin }
    }

    /// The windowing engine. Exposed for hosts that lay out and render the
    /// cells directly.
    pub fn flow(&self) -> &Arc<VirtualFlow<T>> {
        &self.flow
    }

    /// The container skin.
    pub fn skin(&self) -> &Arc<GridListSkin<T>> {
        &self.skin
    }

    // =========================================================================
    // Items
    // =========================================================================

    pub fn items(&self) -> Arc<ItemList<T>> {
        self.flow.items()
    }

    pub fn set_item_list(&self, list: Arc<ItemList<T>>) {
        self.flow.set_item_list(list);
    }

    pub fn count(&self) -> usize {
        self.flow.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.flow.items().is_empty()
    }

    pub fn first_item(&self) -> Option<T> {
        self.flow.items().first()
    }

    pub fn last_item(&self) -> Option<T> {
        self.flow.items().last()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection(&self) -> Arc<SelectionModel<T>> {
        self.flow.selection()
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.flow.selection_mode()
    }

    pub fn set_selection_mode(&self, mode: SelectionMode) {
        self.flow.set_selection_mode(mode);
    }

    pub fn select(&self, item: T) {
        self.flow.selection().select(item);
    }

    pub fn unselect(&self, item: &T) {
        self.flow.selection().unselect(item);
    }

    pub fn clear_selection(&self) {
        self.flow.selection().clear();
    }

    pub fn selected_items(&self) -> Vec<T> {
        self.flow.selection().selected_items()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn set_cell_factory(&self, factory: Arc<dyn CellFactory<T>>) {
        self.flow.set_factory(factory);
    }

    pub fn is_editable(&self) -> bool {
        self.flow.is_editable()
    }

    pub fn set_editable(&self, editable: bool) {
        self.flow.set_editable(editable);
    }

    pub fn allow_unselect_on_click(&self) -> bool {
        self.flow.allow_unselect_on_click()
    }

    pub fn set_allow_unselect_on_click(&self, allow: bool) {
        self.flow.set_allow_unselect_on_click(allow);
    }

    pub fn cell_height(&self) -> f32 {
        self.flow.cell_height()
    }

    pub fn set_cell_height(&self, height: f32) {
        self.flow.set_cell_height(height);
    }

    pub fn min_cell_width_breakpoint(&self) -> f32 {
        self.flow.min_cell_width_breakpoint()
    }

    pub fn set_min_cell_width_breakpoint(&self, width: f32) {
        self.flow.set_min_cell_width_breakpoint(width);
    }

    pub fn max_cells_per_row(&self) -> usize {
        self.flow.max_cells_per_row()
    }

    pub fn set_max_cells_per_row(&self, max: usize) {
        self.flow.set_max_cells_per_row(max);
    }

    pub fn left_gap(&self) -> f32 {
        self.flow.left_gap()
    }

    pub fn set_left_gap(&self, gap: f32) {
        self.flow.set_left_gap(gap);
    }

    pub fn right_gap(&self) -> f32 {
        self.flow.right_gap()
    }

    pub fn set_right_gap(&self, gap: f32) {
        self.flow.set_right_gap(gap);
    }

    // =========================================================================
    // Editing
    // =========================================================================

    pub fn editing_index(&self) -> Option<usize> {
        self.flow.editing_index()
    }

    pub fn edit_start(&self) -> &Signal<EditEvent<T>> {
        &self.flow.edit_start
    }

    pub fn edit_commit(&self) -> &Signal<EditEvent<T>> {
        &self.flow.edit_commit
    }

    pub fn edit_cancel(&self) -> &Signal<EditEvent<T>> {
        &self.flow.edit_cancel
    }

    // =========================================================================
    // Geometry, scrolling, presentation
    // =========================================================================

    pub fn resize(&self, viewport: Size) {
        self.flow.resize(viewport);
    }

    pub fn scroll_fraction(&self) -> f32 {
        self.flow.scroll_fraction()
    }

    pub fn set_scroll_fraction(&self, fraction: f32) {
        self.flow.set_scroll_fraction(fraction);
    }

    pub fn scroll_to_item(&self, item: &T) {
        self.flow.scroll_to_item(item);
    }

    pub fn scroll_to_first(&self) {
        self.flow.scroll_to_first();
    }

    pub fn scroll_to_last(&self) {
        self.flow.scroll_to_last();
    }

    pub fn visible_cells(&self) -> Vec<Arc<GridCell<T>>> {
        self.flow.visible_cells()
    }

    pub fn refresh(&self) {
        self.flow.refresh();
    }

    pub fn placeholder(&self) -> Arc<dyn Visual> {
        self.skin.placeholder()
    }

    pub fn set_placeholder(&self, placeholder: Arc<dyn Visual>) {
        self.skin.set_placeholder(placeholder);
    }

    pub fn current_face(&self) -> SkinFace {
        self.skin.current_face()
    }

    pub fn viewport_opacity(&self) -> f32 {
        self.skin.viewport_opacity()
    }

    /// Advances the scroll animation and the skin fade one frame.
    pub fn tick(&self) {
        self.flow.tick();
        self.skin.tick();
    }
}

assert_impl_all!(GridListView<String>: Send, Sync);
