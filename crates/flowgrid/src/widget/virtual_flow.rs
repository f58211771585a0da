//! The windowing engine.
//!
//! `VirtualFlow<T>` owns the item collection, computes the visible index
//! range from the scroll fraction, viewport size, and columns-per-row,
//! creates cells through a pluggable factory, positions them, and reconciles
//! additions and removals.
//!
//! # Windowing math
//!
//! With `N` items and `C` columns (derived from the viewport width, the
//! minimum cell-width breakpoint, the horizontal gaps, and the column clamp),
//! the grid has `ceil(N / C)` rows of fixed `cell_height`. The visible window
//! is the contiguous row range starting at the row under the scroll offset,
//! spanning one viewport's worth of rows plus one scroll-ahead row. Item
//! `index` lives at row `index / C`, column `index % C`.
//!
//! # Cell cache
//!
//! Cells are created lazily on first visibility and are not evicted when
//! they scroll out of view: a cell stays in the item-to-cell map until its
//! item leaves the collection or the view is fully reset. This trades memory
//! for avoiding rebuild cost on re-scroll.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use flowgrid_core::logging::{span_names, targets, PerfSpan};
use flowgrid_core::{Point, Property, ReadOnlyProperty, Signal, Size};
use parking_lot::{Mutex, RwLock};
use static_assertions::assert_impl_all;

use super::animation::{AnimationState, ScrollAnimation};
use super::cell::{CellFactory, DefaultCellFactory, EditEvent, GridCell};
use crate::model::{ItemList, SelectionMode, SelectionModel};

/// Keeps the list signal connections alive alongside the list they point at.
///
/// Field order matters: guards must drop before the `Arc` they borrow from.
struct ListSubscription<T: Clone + Send + 'static> {
    _inserted: flowgrid_core::ConnectionGuard<(usize, usize)>,
    _removed: flowgrid_core::ConnectionGuard<(usize, Vec<T>)>,
    _replaced: flowgrid_core::ConnectionGuard<(usize, T)>,
    _reset: flowgrid_core::ConnectionGuard<()>,
    _list: Arc<ItemList<T>>,
}

struct SelectionSubscription<T: Clone + Send + 'static> {
    _guard: flowgrid_core::ConnectionGuard<(Vec<T>, Vec<T>)>,
    _model: Arc<SelectionModel<T>>,
}

/// The virtualized grid engine.
///
/// All interior state is lock-protected so the type is `Send + Sync`, but the
/// design is single-threaded and callback-driven: mutations notify their
/// observers synchronously, and no lock is held while a signal fires or a
/// factory runs.
pub struct VirtualFlow<T>
where
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    weak_self: Weak<VirtualFlow<T>>,

    items: RwLock<Arc<ItemList<T>>>,
    selection: Arc<SelectionModel<T>>,
    factory: RwLock<Arc<dyn CellFactory<T>>>,

    /// Lazy-persistent item-to-cell cache.
    cells: RwLock<HashMap<T, Arc<GridCell<T>>>>,
    /// Cells currently attached to the render tree, in layout order.
    visible: RwLock<Vec<Arc<GridCell<T>>>>,

    viewport: RwLock<Size>,
    scroll_fraction: Property<f32>,
    cell_height: Property<f32>,
    min_cell_width: Property<f32>,
    max_cells_per_row: Property<usize>,
    left_gap: Property<f32>,
    right_gap: Property<f32>,

    editable: AtomicBool,
    allow_unselect_on_click: AtomicBool,

    /// The single editing slot: at most one item is under edit widget-wide.
    editing_index: RwLock<Option<usize>>,
    edit_in_flight: AtomicBool,

    scroll_animation: Mutex<ScrollAnimation>,

    /// Emitted when a cell enters edit mode.
    pub edit_start: Signal<EditEvent<T>>,
    /// Emitted when a cell commits a new value.
    pub edit_commit: Signal<EditEvent<T>>,
    /// Emitted when an in-flight edit is abandoned.
    pub edit_cancel: Signal<EditEvent<T>>,
    /// Emitted when the item list *instance* is swapped out, so observers
    /// tracking the current list (the skin) can re-subscribe.
    pub items_replaced: Signal<()>,

    list_subscription: Mutex<Option<ListSubscription<T>>>,
    selection_subscription: Mutex<Option<SelectionSubscription<T>>>,
}

impl<T> VirtualFlow<T>
where
    T: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static,
{
    /// Creates an engine using the built-in text cell factory.
    pub fn new() -> Arc<Self> {
        Self::with_factory(Arc::new(DefaultCellFactory))
    }
}

impl<T> VirtualFlow<T>
where
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    /// Default uniform cell height, in logical pixels.
    pub const DEFAULT_CELL_HEIGHT: f32 = 50.0;
    /// Default minimum width below which a column is not added.
    pub const DEFAULT_MIN_CELL_WIDTH: f32 = 100.0;
    /// Default upper clamp on columns per row.
    pub const DEFAULT_MAX_CELLS_PER_ROW: usize = 12;
    /// Default left inset subtracted from the available width.
    pub const DEFAULT_LEFT_GAP: f32 = 5.0;
    /// Default right inset subtracted from the available width.
    pub const DEFAULT_RIGHT_GAP: f32 = 15.0;

    /// Creates an engine with a custom cell factory.
    pub fn with_factory(factory: Arc<dyn CellFactory<T>>) -> Arc<Self> {
        let flow = Arc::new_cyclic(|weak| Self {
            weak_self: weak.clone(),
            items: RwLock::new(ItemList::new()),
            selection: SelectionModel::new(),
            factory: RwLock::new(factory),
            cells: RwLock::new(HashMap::new()),
            visible: RwLock::new(Vec::new()),
            viewport: RwLock::new(Size::ZERO),
            scroll_fraction: Property::new(0.0),
            cell_height: Property::new(Self::DEFAULT_CELL_HEIGHT),
            min_cell_width: Property::new(Self::DEFAULT_MIN_CELL_WIDTH),
            max_cells_per_row: Property::new(Self::DEFAULT_MAX_CELLS_PER_ROW),
            left_gap: Property::new(Self::DEFAULT_LEFT_GAP),
            right_gap: Property::new(Self::DEFAULT_RIGHT_GAP),
            editable: AtomicBool::new(false),
            allow_unselect_on_click: AtomicBool::new(false),
            editing_index: RwLock::new(None),
            edit_in_flight: AtomicBool::new(false),
            scroll_animation: Mutex::new(ScrollAnimation::new()),
            edit_start: Signal::new(),
            edit_commit: Signal::new(),
            edit_cancel: Signal::new(),
            items_replaced: Signal::new(),
            list_subscription: Mutex::new(None),
            selection_subscription: Mutex::new(None),
        });
        flow.subscribe_to_list();
        flow.subscribe_to_selection();
        flow
    }

    // =========================================================================
    // Collection
    // =========================================================================

    /// The current backing collection.
    pub fn items(&self) -> Arc<ItemList<T>> {
        Arc::clone(&self.items.read())
    }

    /// Swaps out the backing collection instance.
    ///
    /// Triggers a full reset and re-subscribes the engine's listeners to the
    /// new instance; [`Self::items_replaced`] fires so downstream observers
    /// (the skin) can do the same.
    pub fn set_item_list(&self, list: Arc<ItemList<T>>) {
        {
            // Drop the old subscription before releasing the old list.
            *self.list_subscription.lock() = None;
            *self.items.write() = list;
        }
        self.subscribe_to_list();
        self.reset();
        self.items_replaced.emit(());
    }

    fn subscribe_to_list(&self) {
        let list = self.items();

        let weak = self.weak_self.clone();
        let inserted = list.signals.rows_inserted.connect_scoped(move |_| {
            if let Some(flow) = weak.upgrade() {
                flow.update_cells();
            }
        });

        let weak = self.weak_self.clone();
        let removed = list
            .signals
            .rows_removed
            .connect_scoped(move |(_, removed_items)| {
                if let Some(flow) = weak.upgrade() {
                    flow.handle_items_removed(removed_items);
                }
            });

        let weak = self.weak_self.clone();
        let replaced = list
            .signals
            .row_replaced
            .connect_scoped(move |(index, old)| {
                if let Some(flow) = weak.upgrade() {
                    flow.handle_item_replaced(*index, old);
                }
            });

        let weak = self.weak_self.clone();
        let reset = list.signals.reset.connect_scoped(move |_| {
            if let Some(flow) = weak.upgrade() {
                flow.reset();
            }
        });

        *self.list_subscription.lock() = Some(ListSubscription {
            _inserted: inserted,
            _removed: removed,
            _replaced: replaced,
            _reset: reset,
            _list: list,
        });
    }

    fn subscribe_to_selection(&self) {
        let weak = self.weak_self.clone();
        let guard = self
            .selection
            .selection_changed
            .connect_scoped(move |(added, removed)| {
                let Some(flow) = weak.upgrade() else {
                    return;
                };
                let cells = flow.cells.read();
                for item in added {
                    if let Some(cell) = cells.get(item) {
                        cell.set_selected(true);
                    }
                }
                // A cell evicted because its item left the collection is
                // not retroactively unselected; the map lookup simply
                // misses.
                for item in removed {
                    if let Some(cell) = cells.get(item) {
                        cell.set_selected(false);
                    }
                }
            });
        *self.selection_subscription.lock() = Some(SelectionSubscription {
            _guard: guard,
            _model: Arc::clone(&self.selection),
        });
    }

    /// Removal reconciliation: evict cells, then purge selection entries.
    fn handle_items_removed(&self, removed: &[T]) {
        {
            let mut cells = self.cells.write();
            for item in removed {
                cells.remove(item);
            }
        }
        for item in removed {
            self.selection.unselect(item);
        }
        self.update_cells();
    }

    /// Replacement reconciliation: rekey the cached cell and rebind it.
    fn handle_item_replaced(&self, index: usize, old: &T) {
        let Some(new) = self.items().get(index) else {
            return;
        };
        self.selection.unselect(old);
        let cell = self.cells.write().remove(old);
        if let Some(cell) = cell {
            cell.update(new.clone());
            self.cells.write().insert(new, cell);
        }
        self.update_cells();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// The canonical selection state.
    pub fn selection(&self) -> Arc<SelectionModel<T>> {
        Arc::clone(&self.selection)
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    pub fn set_selection_mode(&self, mode: SelectionMode) {
        self.selection.set_mode(mode);
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Replaces the cell factory, invalidating every previously created cell.
    pub fn set_factory(&self, factory: Arc<dyn CellFactory<T>>) {
        *self.factory.write() = factory;
        self.reset();
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height.get()
    }

    /// Changes the uniform cell height. Triggers a full reset.
    pub fn set_cell_height(&self, height: f32) {
        if self.cell_height.set(height) {
            self.reset();
        }
    }

    pub fn min_cell_width_breakpoint(&self) -> f32 {
        self.min_cell_width.get()
    }

    pub fn set_min_cell_width_breakpoint(&self, width: f32) {
        if self.min_cell_width.set(width) {
            // Row membership of every item may change; reflow.
            self.update_cells();
        }
    }

    pub fn max_cells_per_row(&self) -> usize {
        self.max_cells_per_row.get()
    }

    pub fn set_max_cells_per_row(&self, max: usize) {
        if self.max_cells_per_row.set(max.max(1)) {
            self.update_cells();
        }
    }

    pub fn left_gap(&self) -> f32 {
        self.left_gap.get()
    }

    pub fn set_left_gap(&self, gap: f32) {
        if self.left_gap.set(gap) {
            self.update_cells();
        }
    }

    pub fn right_gap(&self) -> f32 {
        self.right_gap.get()
    }

    pub fn set_right_gap(&self, gap: f32) {
        if self.right_gap.set(gap) {
            self.update_cells();
        }
    }

    pub fn is_editable(&self) -> bool {
        self.editable.load(Ordering::SeqCst)
    }

    pub fn set_editable(&self, editable: bool) {
        self.editable.store(editable, Ordering::SeqCst);
    }

    pub fn allow_unselect_on_click(&self) -> bool {
        self.allow_unselect_on_click.load(Ordering::SeqCst)
    }

    pub fn set_allow_unselect_on_click(&self, allow: bool) {
        self.allow_unselect_on_click.store(allow, Ordering::SeqCst);
    }

    // =========================================================================
    // Edit slot
    // =========================================================================

    /// The index currently under edit, if any.
    pub fn editing_index(&self) -> Option<usize> {
        *self.editing_index.read()
    }

    /// Claims the editing slot for `index`.
    ///
    /// Fails when another edit is already in flight anywhere in the widget.
    pub(crate) fn begin_edit(&self, index: usize) -> bool {
        if self
            .edit_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        *self.editing_index.write() = Some(index);
        tracing::trace!(target: targets::FLOW, index, "editing slot claimed");
        true
    }

    /// Releases the editing slot if it still belongs to `index`
    /// (compare-and-clear).
    pub(crate) fn end_edit(&self, index: usize) -> bool {
        let mut slot = self.editing_index.write();
        if *slot == Some(index) {
            *slot = None;
            self.edit_in_flight.store(false, Ordering::SeqCst);
            tracing::trace!(target: targets::FLOW, index, "editing slot released");
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Geometry and scrolling
    // =========================================================================

    /// Current viewport size.
    pub fn viewport(&self) -> Size {
        *self.viewport.read()
    }

    /// Applies a new viewport size and recomputes the visible set.
    pub fn resize(&self, viewport: Size) {
        *self.viewport.write() = viewport;
        self.update_cells();
    }

    /// Columns per row for the current width:
    /// `clamp(1, floor((width - gaps) / breakpoint), max_cells_per_row)`.
    pub fn columns(&self) -> usize {
        let width = self.viewport.read().width;
        let available = width - self.left_gap.get() - self.right_gap.get();
        let breakpoint = self.min_cell_width.get();
        let max = self.max_cells_per_row.get().max(1);
        if breakpoint <= 0.0 {
            return max;
        }
        let raw = (available / breakpoint).floor();
        if raw.is_nan() || raw < 1.0 {
            1
        } else {
            (raw as usize).min(max)
        }
    }

    /// Rows needed to hold the collection at the current column count.
    pub fn row_count(&self) -> usize {
        let len = self.items().len();
        len.div_ceil(self.columns())
    }

    /// Total scrollable content height.
    pub fn content_height(&self) -> f32 {
        self.row_count() as f32 * self.cell_height.get()
    }

    pub fn scroll_fraction(&self) -> f32 {
        self.scroll_fraction.get()
    }

    /// Read-only view of the scroll position property.
    pub fn scroll_fraction_property(&self) -> ReadOnlyProperty<'_, f32> {
        ReadOnlyProperty::new(&self.scroll_fraction)
    }

    /// Read-only view of the cell-height property.
    pub fn cell_height_property(&self) -> ReadOnlyProperty<'_, f32> {
        ReadOnlyProperty::new(&self.cell_height)
    }

    /// Sets the scroll position as a fraction in `[0, 1]` of the scrollable
    /// range, recomputing the visible set on change.
    pub fn set_scroll_fraction(&self, fraction: f32) {
        if self.scroll_fraction.set(fraction.clamp(0.0, 1.0)) {
            self.update_cells();
        }
    }

    /// The visible row window `[first, last)`, including one scroll-ahead
    /// row.
    pub fn visible_range(&self) -> (usize, usize) {
        let len = self.items().len();
        let cell_height = self.cell_height.get();
        if len == 0 || cell_height <= 0.0 {
            return (0, 0);
        }
        let viewport = *self.viewport.read();
        let row_count = len.div_ceil(self.columns());
        let content_height = row_count as f32 * cell_height;

        let offset = self.scroll_fraction.get() * (content_height - viewport.height);
        let first = (offset / cell_height).floor().max(0.0) as usize;
        let first = first.min(row_count);

        let span = (viewport.height / cell_height).ceil() as usize + 1;
        let last = (first + span).min(row_count);
        (first, last)
    }

    /// Animates the scroll position so that `item`'s row lands at the top of
    /// the viewport. A no-op when the item is not in the collection.
    ///
    /// The animation itself does not recompute the visible set per frame;
    /// [`Self::tick`] applies intermediate values silently and forces one
    /// recompute on completion.
    pub fn scroll_to_item(&self, item: &T) {
        let Some(index) = self.items().index_of(item) else {
            tracing::trace!(target: targets::FLOW, "scroll_to_item: item not found");
            return;
        };
        let row = index / self.columns();
        let viewport_height = self.viewport.read().height;
        let denom = self.content_height() - viewport_height;
        let target = if denom > 0.0 {
            ((row as f32 * self.cell_height.get()) / denom).min(1.0)
        } else {
            0.0
        };
        let current = self.scroll_fraction.get();
        tracing::debug!(target: targets::FLOW, index, row, target, "scroll to item");
        self.scroll_animation.lock().start(current, target);
    }

    /// Scrolls to the first item, if any.
    pub fn scroll_to_first(&self) {
        if let Some(item) = self.items().first() {
            self.scroll_to_item(&item);
        }
    }

    /// Scrolls to the last item, if any.
    pub fn scroll_to_last(&self) {
        if let Some(item) = self.items().last() {
            self.scroll_to_item(&item);
        }
    }

    /// Advances the scroll animation one frame.
    pub fn tick(&self) {
        let state = self.scroll_animation.lock().update();
        match state {
            AnimationState::Running(value) => {
                // Intermediate frames move the offset without a recompute.
                self.scroll_fraction.set_silent(value.clamp(0.0, 1.0));
            }
            AnimationState::Finished(value) => {
                self.scroll_fraction.set_silent(value.clamp(0.0, 1.0));
                self.update_cells();
            }
            AnimationState::Idle => {}
        }
    }

    /// Whether a scroll animation is currently running.
    pub fn is_scrolling(&self) -> bool {
        self.scroll_animation.lock().is_running()
    }

    // =========================================================================
    // Windowing
    // =========================================================================

    /// Recomputes the visible cell set and lays it out.
    ///
    /// Cells that fall out of the window are detached from the render tree
    /// but stay cached; newly visible items get cells from the cache or the
    /// factory.
    pub fn update_cells(&self) {
        let _span = PerfSpan::new(span_names::UPDATE_CELLS);
        let items = self.items();
        let len = items.len();
        let viewport = *self.viewport.read();
        let columns = self.columns();
        let cell_height = self.cell_height.get();
        let left_gap = self.left_gap.get();
        let (first_row, last_row) = self.visible_range();

        let available = (viewport.width - left_gap - self.right_gap.get()).max(0.0);
        let cell_width = available / columns as f32;

        tracing::trace!(
            target: targets::FLOW,
            len,
            columns,
            first_row,
            last_row,
            "update cells"
        );

        let mut new_visible = Vec::new();
        'rows: for row in first_row..last_row {
            for col in 0..columns {
                let index = row * columns + col;
                if index >= len {
                    // Ragged last row.
                    break 'rows;
                }
                let Some(item) = items.get(index) else {
                    break 'rows;
                };
                let Some(cell) = self.obtain_cell(item) else {
                    return;
                };
                cell.visual().resize(Size::new(cell_width, cell_height));
                cell.visual().relocate(Point::new(
                    col as f32 * cell_width + left_gap,
                    row as f32 * cell_height,
                ));
                new_visible.push(cell);
            }
        }

        *self.visible.write() = new_visible;
    }

    /// Cache lookup, falling back to the factory on miss. Either way the
    /// cell is rebound so its mirrored flags track the current indices.
    fn obtain_cell(&self, item: T) -> Option<Arc<GridCell<T>>> {
        let cached = self.cells.read().get(&item).cloned();
        if let Some(cell) = cached {
            cell.update(item);
            return Some(cell);
        }

        let factory = Arc::clone(&self.factory.read());
        let flow = self.weak_self.upgrade()?;
        let cell = factory.create(&flow);
        cell.update(item.clone());
        self.cells.write().insert(item, Arc::clone(&cell));
        Some(cell)
    }

    /// Cells currently attached, in layout order.
    pub fn visible_cells(&self) -> Vec<Arc<GridCell<T>>> {
        self.visible.read().clone()
    }

    /// The cached cell for `item`, visible or not.
    pub fn cell_for_item(&self, item: &T) -> Option<Arc<GridCell<T>>> {
        self.cells.read().get(item).cloned()
    }

    /// Number of materialized cells, including detached ones.
    pub fn cached_cell_count(&self) -> usize {
        self.cells.read().len()
    }

    /// Discards every cell and the selection, then recomputes from scratch.
    pub fn refresh(&self) {
        self.selection.clear();
        self.reset();
    }

    /// Full reset: clears the render tree, the cell cache, the visible-cell
    /// bookkeeping, and the editing slot, then recomputes.
    ///
    /// Selection entries whose item is no longer in the collection are
    /// dropped here, so wholesale replacement (`set_items`, `clear`, list
    /// instance swap) upholds the same guarantee as granular removal: the
    /// selection never references an absent item.
    fn reset(&self) {
        let _span = PerfSpan::new(span_names::RESET);
        tracing::debug!(target: targets::FLOW, "full reset");
        self.visible.write().clear();
        self.cells.write().clear();
        *self.editing_index.write() = None;
        self.edit_in_flight.store(false, Ordering::SeqCst);
        self.prune_selection();
        self.update_cells();
    }

    /// Drops selection entries absent from the current collection, as one
    /// coherent replacement.
    fn prune_selection(&self) {
        let items = self.items();
        let retained: Vec<T> = self.selection.with_selected(|selected| {
            selected
                .iter()
                .filter(|it| items.contains(it))
                .cloned()
                .collect()
        });
        if retained.len() != self.selection.len() {
            self.selection.select_items(&retained);
        }
    }
}

assert_impl_all!(VirtualFlow<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// 240pt wide viewport: (240 - 5 - 15) / 100 = 2 columns, each 110pt.
    /// 100pt tall viewport at 50pt cells: 2 rows visible + 1 scroll-ahead.
    fn flow_with(items: Vec<&str>) -> Arc<VirtualFlow<String>> {
        let flow = VirtualFlow::<String>::new();
        flow.items()
            .set_items(items.into_iter().map(String::from).collect());
        flow.resize(Size::new(240.0, 100.0));
        flow
    }

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("item-{i}")).collect()
    }

    #[test]
    fn test_columns_from_breakpoint() {
        let flow = flow_with(vec!["a"]);
        assert_eq!(flow.columns(), 2);

        // Narrow viewport: never below one column.
        flow.resize(Size::new(40.0, 100.0));
        assert_eq!(flow.columns(), 1);

        // Huge viewport: clamped to max_cells_per_row.
        flow.resize(Size::new(5000.0, 100.0));
        assert_eq!(flow.columns(), VirtualFlow::<String>::DEFAULT_MAX_CELLS_PER_ROW);

        flow.set_max_cells_per_row(3);
        assert_eq!(flow.columns(), 3);
    }

    #[test]
    fn test_columns_monotone_with_width() {
        let flow = flow_with(vec!["a"]);
        let mut last = 0;
        for width in (100..2000).step_by(50) {
            flow.resize(Size::new(width as f32, 100.0));
            let columns = flow.columns();
            assert!(columns >= last, "columns shrank as width grew");
            assert!((1..=12).contains(&columns));
            last = columns;
        }
    }

    #[test]
    fn test_row_count_formula() {
        let flow = flow_with(vec!["a", "b", "c", "d", "e"]);
        // 5 items over 2 columns -> 3 rows.
        assert_eq!(flow.row_count(), 3);
        assert_eq!(flow.content_height(), 150.0);

        flow.items().push("f".into());
        assert_eq!(flow.row_count(), 3);
        flow.items().push("g".into());
        assert_eq!(flow.row_count(), 4);
    }

    #[test]
    fn test_item_positions() {
        let flow = flow_with(vec!["a", "b", "c", "d", "e"]);

        // "d" is index 3 -> row 1, col 1 -> (1 * 110 + 5, 1 * 50).
        let cell = flow.cell_for_item(&"d".to_string()).unwrap();
        let bounds = cell.visual().bounds();
        assert_eq!(bounds.origin, Point::new(115.0, 50.0));
        assert_eq!(bounds.size, Size::new(110.0, 50.0));

        // "e" starts the ragged last row at column 0.
        let cell = flow.cell_for_item(&"e".to_string()).unwrap();
        assert_eq!(cell.visual().bounds().origin, Point::new(5.0, 100.0));
    }

    #[test]
    fn test_every_index_maps_to_one_slot() {
        let flow = flow_with(vec![]);
        flow.items().set_items(names(23));
        let columns = flow.columns();

        let visible = flow.visible_cells();
        for (position, cell) in visible.iter().enumerate() {
            let index = flow.items().index_of(&cell.item().unwrap()).unwrap();
            assert_eq!(index, position, "layout order must follow index order");
            let row = index / columns;
            let col = index % columns;
            assert_eq!(row * columns + col, index);
        }
    }

    #[test]
    fn test_visible_window_tracks_scroll() {
        let flow = flow_with(vec![]);
        flow.items().set_items(names(40)); // 20 rows at 2 columns

        assert_eq!(flow.visible_range(), (0, 3));
        let first_visible = flow.visible_cells();
        assert_eq!(first_visible.len(), 6);

        flow.set_scroll_fraction(1.0);
        let (first, last) = flow.visible_range();
        assert_eq!(last, 20);
        assert!(first >= 17);
        // The very first items are no longer attached.
        let visible = flow.visible_cells();
        assert!(visible
            .iter()
            .all(|cell| cell.item() != Some("item-0".to_string())));
    }

    #[test]
    fn test_cells_persist_after_scroll_out() {
        let flow = flow_with(vec![]);
        flow.items().set_items(names(40));

        let materialized = flow.cached_cell_count();
        assert_eq!(materialized, 6);

        flow.set_scroll_fraction(1.0);
        // Off-screen cells stay cached; new ones are added for the new window.
        assert!(flow.cached_cell_count() > materialized);
        assert!(flow.cell_for_item(&"item-0".to_string()).is_some());

        // Scrolling back reuses the cached cell, not a fresh one.
        let before = flow.cell_for_item(&"item-0".to_string()).unwrap();
        flow.set_scroll_fraction(0.0);
        let after = flow.cell_for_item(&"item-0".to_string()).unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_removal_evicts_cell_and_selection() {
        let flow = flow_with(vec!["a", "b", "c"]);
        flow.set_selection_mode(SelectionMode::Multiple);
        flow.selection().select("a".to_string());
        flow.selection().select("b".to_string());

        flow.items().remove_item(&"b".to_string());

        assert!(flow.cell_for_item(&"b".to_string()).is_none());
        // The removed item leaves the selection; others are untouched.
        assert_eq!(flow.selection().selected_items(), vec!["a".to_string()]);
    }

    #[test]
    fn test_replace_rekeys_cached_cell() {
        let flow = flow_with(vec!["a", "b", "c"]);
        let before = flow.cell_for_item(&"b".to_string()).unwrap();

        flow.items().replace(1, "z".to_string());

        assert!(flow.cell_for_item(&"b".to_string()).is_none());
        let after = flow.cell_for_item(&"z".to_string()).unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.item(), Some("z".to_string()));
    }

    #[test]
    fn test_set_items_resets_cache() {
        let flow = flow_with(vec!["a", "b", "c"]);
        assert!(flow.cached_cell_count() > 0);

        flow.items().set_items(vec!["x".to_string()]);

        assert_eq!(flow.cached_cell_count(), 1);
        assert!(flow.cell_for_item(&"a".to_string()).is_none());
        let visible = flow.visible_cells();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].item(), Some("x".to_string()));
    }

    #[test]
    fn test_set_items_purges_stale_selection() {
        let flow = flow_with(vec!["a", "b", "c"]);
        flow.selection().select("b".to_string());

        let deltas = Arc::new(Mutex::new(None));
        let deltas_clone = deltas.clone();
        flow.selection().selection_changed.connect(move |args| {
            *deltas_clone.lock() = Some(args.clone());
        });

        flow.items()
            .set_items(vec!["x".to_string(), "y".to_string()]);

        // The stale entry is dropped and reported to listeners.
        assert!(flow.selection().is_empty());
        assert_eq!(*deltas.lock(), Some((vec![], vec!["b".to_string()])));
    }

    #[test]
    fn test_clear_purges_selection() {
        let flow = flow_with(vec!["a", "b"]);
        flow.selection().select("a".to_string());

        flow.items().clear();
        assert!(flow.selection().is_empty());
    }

    #[test]
    fn test_list_swap_keeps_only_present_selection() {
        let flow = flow_with(vec!["a", "b"]);
        flow.set_selection_mode(SelectionMode::Multiple);
        flow.selection().select("a".to_string());
        flow.selection().select("b".to_string());

        flow.set_item_list(ItemList::from_items(vec![
            "b".to_string(),
            "z".to_string(),
        ]));

        // Entries still present in the new collection survive the swap.
        assert_eq!(flow.selection().selected_items(), vec!["b".to_string()]);
    }

    #[test]
    fn test_refresh_clears_selection() {
        let flow = flow_with(vec!["a", "b"]);
        flow.selection().select("a".to_string());

        flow.refresh();
        assert!(flow.selection().is_empty());
        assert_eq!(flow.visible_cells().len(), 2);
    }

    #[test]
    fn test_read_only_property_views() {
        let flow = flow_with(vec!["a", "b", "c", "d"]);

        let scroll = flow.scroll_fraction_property();
        assert_eq!(scroll.get(), 0.0);

        flow.set_cell_height(25.0);
        assert_eq!(flow.cell_height_property().get(), 25.0);
    }

    #[test]
    fn test_set_item_list_resubscribes() {
        let flow = flow_with(vec!["a"]);
        let replaced = Arc::new(Mutex::new(0));

        let replaced_clone = replaced.clone();
        flow.items_replaced.connect(move |_| {
            *replaced_clone.lock() += 1;
        });

        let new_list = ItemList::from_items(vec!["x".to_string(), "y".to_string()]);
        flow.set_item_list(Arc::clone(&new_list));
        assert_eq!(*replaced.lock(), 1);
        assert_eq!(flow.visible_cells().len(), 2);

        // Mutations of the new instance drive the engine.
        new_list.push("z".to_string());
        assert_eq!(flow.visible_cells().len(), 3);
    }

    #[test]
    fn test_factory_change_invalidates_cells() {
        let flow = flow_with(vec!["a", "b"]);
        let old_cell = flow.cell_for_item(&"a".to_string()).unwrap();

        flow.set_factory(Arc::new(DefaultCellFactory));

        let new_cell = flow.cell_for_item(&"a".to_string()).unwrap();
        assert!(!Arc::ptr_eq(&old_cell, &new_cell));
    }

    #[test]
    fn test_cell_height_change_resets() {
        let flow = flow_with(vec!["a", "b", "c"]);
        flow.set_cell_height(25.0);
        assert_eq!(flow.content_height(), 50.0);
        let cell = flow.cell_for_item(&"a".to_string()).unwrap();
        assert_eq!(cell.visual().bounds().size.height, 25.0);
    }

    #[test]
    fn test_scroll_to_absent_item_is_noop() {
        let flow = flow_with(vec!["a"]);
        flow.scroll_to_item(&"missing".to_string());
        assert!(!flow.is_scrolling());
        assert_eq!(flow.scroll_fraction(), 0.0);
    }

    #[test]
    fn test_scroll_to_item_reaches_target_row() {
        let flow = flow_with(vec![]);
        flow.items().set_items(names(40)); // 20 rows, content 1000pt, viewport 100pt

        // item-30 -> row 15; target = 15 * 50 / (1000 - 100) = 0.8333…
        flow.scroll_to_item(&"item-30".to_string());
        assert!(flow.is_scrolling());

        std::thread::sleep(ScrollAnimation::DEFAULT_DURATION + std::time::Duration::from_millis(100));
        flow.tick();

        assert!(!flow.is_scrolling());
        assert!((flow.scroll_fraction() - 15.0 * 50.0 / 900.0).abs() < 1e-4);
        // Completion forced a recompute: the target row is attached.
        let visible = flow.visible_cells();
        assert!(visible
            .iter()
            .any(|cell| cell.item() == Some("item-30".to_string())));
    }

    #[test]
    fn test_refresh_rebuilds_everything() {
        let flow = flow_with(vec!["a", "b"]);
        let old_cell = flow.cell_for_item(&"a".to_string()).unwrap();

        flow.refresh();

        let new_cell = flow.cell_for_item(&"a".to_string()).unwrap();
        assert!(!Arc::ptr_eq(&old_cell, &new_cell));
        assert_eq!(flow.visible_cells().len(), 2);
    }

    #[test]
    fn test_empty_collection_has_no_cells() {
        let flow = flow_with(vec![]);
        assert_eq!(flow.visible_range(), (0, 0));
        assert!(flow.visible_cells().is_empty());
        assert_eq!(flow.cached_cell_count(), 0);
    }
}
