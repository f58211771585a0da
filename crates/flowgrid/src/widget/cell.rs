//! Cells and their edit lifecycle.
//!
//! A [`GridCell`] binds one item to one visual unit and mirrors the
//! `selected`/`editing` flags. The canonical selection lives in the
//! [`SelectionModel`](crate::model::SelectionModel); the one editing slot
//! lives on the [`VirtualFlow`](super::VirtualFlow). Edit transitions are
//! guarded no-ops when the preconditions fail: starting an edit while
//! another is in flight does nothing, and commit/cancel from a cell that is
//! not the current editor does nothing.

use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use flowgrid_core::logging::targets;
use parking_lot::RwLock;
use static_assertions::assert_impl_all;

use super::virtual_flow::VirtualFlow;
use super::visual::{TextVisual, Visual};

/// Payload of the edit lifecycle signals.
///
/// `value` is `Some` only for commits; start and cancel carry the index
/// alone.
#[derive(Debug, Clone, PartialEq)]
pub struct EditEvent<T> {
    /// Collection index of the item the edit concerns.
    pub index: usize,
    /// The committed value, if any.
    pub value: Option<T>,
}

/// Produces one cell per newly visible item.
///
/// Implementations receive the owning engine so the created cell can reach
/// the selection model and the editing slot; the engine binds the cell to an
/// item via [`GridCell::update`] immediately after creation. Implementations
/// must not call back into the engine during `create`.
pub trait CellFactory<T>: Send + Sync
where
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    fn create(&self, flow: &Arc<VirtualFlow<T>>) -> Arc<GridCell<T>>;
}

/// The built-in factory: renders each item's `Display` text into a
/// [`TextVisual`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCellFactory;

impl<T> CellFactory<T> for DefaultCellFactory
where
    T: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static,
{
    fn create(&self, flow: &Arc<VirtualFlow<T>>) -> Arc<GridCell<T>> {
        let text = Arc::new(TextVisual::new(""));
        let hook_target = Arc::clone(&text);
        let cell = GridCell::new(flow, text)
            .with_update_hook(move |item: &T| hook_target.set_text(&item.to_string()));
        Arc::new(cell)
    }
}

/// One visual+state unit bound to exactly one item at a time.
pub struct GridCell<T>
where
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    flow: Weak<VirtualFlow<T>>,
    visual: Arc<dyn Visual>,
    item: RwLock<Option<T>>,
    selected: AtomicBool,
    editing: AtomicBool,
    update_hook: Option<Box<dyn Fn(&T) + Send + Sync>>,
}

impl<T> GridCell<T>
where
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    /// Creates an unbound cell backed by `visual`.
    pub fn new(flow: &Arc<VirtualFlow<T>>, visual: Arc<dyn Visual>) -> Self {
        Self {
            flow: Arc::downgrade(flow),
            visual,
            item: RwLock::new(None),
            selected: AtomicBool::new(false),
            editing: AtomicBool::new(false),
            update_hook: None,
        }
    }

    /// Installs a hook run on every rebind, before the state flags refresh.
    ///
    /// The default factory uses this to push the item's display text into
    /// the cell's visual.
    pub fn with_update_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.update_hook = Some(Box::new(hook));
        self
    }

    /// The visual unit this cell positions and sizes.
    pub fn visual(&self) -> Arc<dyn Visual> {
        Arc::clone(&self.visual)
    }

    /// The item currently bound, if any.
    pub fn item(&self) -> Option<T> {
        self.item.read().clone()
    }

    /// Mirrored selection flag.
    pub fn is_selected(&self) -> bool {
        self.selected.load(Ordering::SeqCst)
    }

    pub(crate) fn set_selected(&self, selected: bool) {
        self.selected.store(selected, Ordering::SeqCst);
    }

    /// Whether this cell is the widget's current editor.
    pub fn is_editing(&self) -> bool {
        self.editing.load(Ordering::SeqCst)
    }

    /// Current collection index of the bound item, if it is still present.
    pub fn index(&self) -> Option<usize> {
        let flow = self.flow.upgrade()?;
        let item = self.item()?;
        flow.items().index_of(&item)
    }

    /// Rebinds the cell to `item` and refreshes both mirrored flags.
    pub fn update(&self, item: T) {
        if let Some(hook) = &self.update_hook {
            hook(&item);
        }
        if let Some(flow) = self.flow.upgrade() {
            self.selected
                .store(flow.selection().is_selected(&item), Ordering::SeqCst);
            let editing_index = flow.editing_index();
            let editing =
                editing_index.is_some() && editing_index == flow.items().index_of(&item);
            self.editing.store(editing, Ordering::SeqCst);
        }
        *self.item.write() = Some(item);
    }

    /// Handle a click on this cell.
    ///
    /// If the bound item is not selected, select it (mode-dependent). If it
    /// is already selected and unselect-on-click is enabled: with
    /// `toggle_modifier` held, toggle off just this item; without it,
    /// collapse the selection to just this item.
    pub fn click(&self, toggle_modifier: bool) {
        let Some(flow) = self.flow.upgrade() else {
            return;
        };
        let Some(item) = self.item() else {
            return;
        };
        let selection = flow.selection();

        if !selection.is_selected(&item) {
            selection.select(item);
        } else if flow.allow_unselect_on_click() {
            if toggle_modifier {
                selection.unselect(&item);
            } else {
                selection.select_items(std::slice::from_ref(&item));
            }
        }
    }

    /// Begin editing this cell's item.
    ///
    /// Permitted only when the widget is editable and no edit is in flight
    /// anywhere in the widget; otherwise a guarded no-op. On success the
    /// widget's editing index records this item, an edit-start event fires,
    /// and the cell's visual is asked for focus.
    pub fn start_edit(&self) {
        let Some(flow) = self.flow.upgrade() else {
            return;
        };
        if !flow.is_editable() {
            return;
        }
        let Some(item) = self.item() else {
            return;
        };
        let Some(index) = flow.items().index_of(&item) else {
            return;
        };
        if !flow.begin_edit(index) {
            tracing::trace!(target: targets::CELL, index, "start_edit refused, edit in flight");
            return;
        }

        self.editing.store(true, Ordering::SeqCst);
        tracing::debug!(target: targets::CELL, index, "edit started");
        flow.edit_start.emit(EditEvent { index, value: None });
        self.visual.request_focus();
    }

    /// Commit `new_item` in place of the bound item.
    ///
    /// Permitted only when this cell is the current editor and the widget's
    /// editing index still matches the bound item's index; otherwise a
    /// guarded no-op. Emits the commit event, moves any selection from the
    /// old value to the new one, replaces the item in the collection, and
    /// clears the editing slot.
    pub fn commit_edit(&self, new_item: T) {
        let Some(flow) = self.flow.upgrade() else {
            return;
        };
        if !self.is_editing() {
            return;
        }
        let Some(item) = self.item() else {
            return;
        };
        let Some(index) = flow.items().index_of(&item) else {
            return;
        };
        if flow.editing_index() != Some(index) {
            return;
        }

        tracing::debug!(target: targets::CELL, index, "edit committed");
        flow.edit_commit.emit(EditEvent {
            index,
            value: Some(new_item.clone()),
        });

        let was_selected = flow.selection().is_selected(&item);
        flow.selection().unselect(&item);
        flow.items().replace(index, new_item.clone());
        if was_selected {
            flow.selection().select(new_item.clone());
        }

        flow.end_edit(index);
        self.editing.store(false, Ordering::SeqCst);
        self.update(new_item);
    }

    /// Abandon the in-flight edit.
    ///
    /// Permitted only when this cell is the current editor; otherwise a
    /// guarded no-op. Emits the cancel event with no value.
    pub fn cancel_edit(&self) {
        let Some(flow) = self.flow.upgrade() else {
            return;
        };
        if !self.is_editing() {
            return;
        }
        let Some(item) = self.item() else {
            return;
        };
        let Some(index) = flow.items().index_of(&item) else {
            return;
        };
        if flow.editing_index() != Some(index) {
            return;
        }

        flow.end_edit(index);
        self.editing.store(false, Ordering::SeqCst);
        tracing::debug!(target: targets::CELL, index, "edit cancelled");
        flow.edit_cancel.emit(EditEvent { index, value: None });
    }
}

assert_impl_all!(GridCell<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SelectionMode;
    use flowgrid_core::Size;
    use parking_lot::Mutex;

    fn flow_with(items: Vec<&str>) -> Arc<VirtualFlow<String>> {
        let flow = VirtualFlow::<String>::new();
        flow.items()
            .set_items(items.into_iter().map(String::from).collect());
        flow.resize(Size::new(240.0, 100.0));
        flow
    }

    fn cell_for(flow: &Arc<VirtualFlow<String>>, item: &str) -> Arc<GridCell<String>> {
        flow.cell_for_item(&item.to_string())
            .expect("cell should be materialized")
    }

    #[test]
    fn test_default_factory_renders_display_text() {
        let flow = flow_with(vec!["alpha"]);
        let cell = cell_for(&flow, "alpha");

        let bounds = cell.visual().bounds();
        assert!(bounds.size.width > 0.0);
        assert_eq!(cell.item(), Some("alpha".to_string()));
    }

    #[test]
    fn test_click_selects_unselected_item() {
        let flow = flow_with(vec!["a", "b"]);
        let cell = cell_for(&flow, "a");

        cell.click(false);
        assert!(cell.is_selected());
        assert_eq!(flow.selection().selected_items(), vec!["a".to_string()]);
    }

    #[test]
    fn test_click_selected_without_unselect_flag_is_noop() {
        let flow = flow_with(vec!["a"]);
        let cell = cell_for(&flow, "a");

        cell.click(false);
        cell.click(false);
        assert!(cell.is_selected());
    }

    #[test]
    fn test_click_with_modifier_toggles_off() {
        let flow = flow_with(vec!["a", "b"]);
        flow.set_selection_mode(SelectionMode::Multiple);
        flow.set_allow_unselect_on_click(true);

        let cell_a = cell_for(&flow, "a");
        let cell_b = cell_for(&flow, "b");
        cell_a.click(false);
        cell_b.click(false);

        cell_a.click(true);
        assert!(!cell_a.is_selected());
        assert_eq!(flow.selection().selected_items(), vec!["b".to_string()]);
    }

    #[test]
    fn test_click_without_modifier_collapses_selection() {
        let flow = flow_with(vec!["a", "b", "c"]);
        flow.set_selection_mode(SelectionMode::Multiple);
        flow.set_allow_unselect_on_click(true);

        let cell_a = cell_for(&flow, "a");
        let cell_b = cell_for(&flow, "b");
        cell_a.click(false);
        cell_b.click(false);

        cell_a.click(false);
        assert_eq!(flow.selection().selected_items(), vec!["a".to_string()]);
        assert!(cell_a.is_selected());
        assert!(!cell_b.is_selected());
    }

    #[test]
    fn test_start_edit_requires_editable() {
        let flow = flow_with(vec!["a"]);
        let cell = cell_for(&flow, "a");

        cell.start_edit();
        assert!(!cell.is_editing());
        assert_eq!(flow.editing_index(), None);
    }

    #[test]
    fn test_edit_exclusivity() {
        let flow = flow_with(vec!["a", "b"]);
        flow.set_editable(true);

        let cell_a = cell_for(&flow, "a");
        let cell_b = cell_for(&flow, "b");

        cell_a.start_edit();
        cell_b.start_edit();

        // A stays the editor; B's attempt is a guarded no-op.
        assert!(cell_a.is_editing());
        assert!(!cell_b.is_editing());
        assert_eq!(flow.editing_index(), Some(0));
    }

    #[test]
    fn test_start_edit_requests_focus() {
        struct CapturingFactory {
            visuals: Mutex<Vec<Arc<TextVisual>>>,
        }

        impl CellFactory<String> for CapturingFactory {
            fn create(&self, flow: &Arc<VirtualFlow<String>>) -> Arc<GridCell<String>> {
                let text = Arc::new(TextVisual::new(""));
                self.visuals.lock().push(Arc::clone(&text));
                Arc::new(GridCell::new(flow, text))
            }
        }

        let factory = Arc::new(CapturingFactory {
            visuals: Mutex::new(Vec::new()),
        });
        let flow = VirtualFlow::<String>::with_factory(factory.clone());
        flow.items().set_items(vec!["a".to_string()]);
        flow.set_editable(true);
        flow.resize(Size::new(240.0, 100.0));

        let cell = cell_for(&flow, "a");
        cell.start_edit();

        assert!(cell.is_editing());
        let visuals = factory.visuals.lock();
        assert_eq!(visuals.len(), 1);
        assert!(visuals[0].is_focused());
    }

    #[test]
    fn test_commit_edit_replaces_and_reselects() {
        let flow = flow_with(vec!["a", "b", "c"]);
        flow.set_editable(true);

        let cell = cell_for(&flow, "c");
        cell.click(false); // select "c"
        cell.start_edit();

        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        flow.edit_commit.connect(move |event| {
            events_clone.lock().push(event.clone());
        });

        cell.commit_edit("x".to_string());

        assert_eq!(flow.items().items(), vec!["a", "b", "x"]);
        assert_eq!(flow.editing_index(), None);
        assert!(!cell.is_editing());
        // Selection transferred from the old value to the new one.
        assert_eq!(flow.selection().selected_items(), vec!["x".to_string()]);
        // Exactly one commit event, carrying the new value and index 2.
        let events = events.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].index, 2);
        assert_eq!(events[0].value, Some("x".to_string()));
    }

    #[test]
    fn test_commit_without_edit_is_noop() {
        let flow = flow_with(vec!["a"]);
        flow.set_editable(true);
        let cell = cell_for(&flow, "a");

        let fired = Arc::new(Mutex::new(0));
        let fired_clone = fired.clone();
        flow.edit_commit.connect(move |_| {
            *fired_clone.lock() += 1;
        });

        cell.commit_edit("x".to_string());
        assert_eq!(*fired.lock(), 0);
        assert_eq!(flow.items().items(), vec!["a"]);
    }

    #[test]
    fn test_cancel_edit_clears_slot() {
        let flow = flow_with(vec!["a", "b"]);
        flow.set_editable(true);
        let cell = cell_for(&flow, "b");

        let cancels = Arc::new(Mutex::new(Vec::new()));
        let cancels_clone = cancels.clone();
        flow.edit_cancel.connect(move |event| {
            cancels_clone.lock().push(event.clone());
        });

        cell.start_edit();
        cell.cancel_edit();

        assert!(!cell.is_editing());
        assert_eq!(flow.editing_index(), None);
        assert_eq!(
            *cancels.lock(),
            vec![EditEvent { index: 1, value: None }]
        );

        // A fresh edit is possible after cancel.
        cell.start_edit();
        assert!(cell.is_editing());
    }

    #[test]
    fn test_cancel_from_non_editor_is_noop() {
        let flow = flow_with(vec!["a", "b"]);
        flow.set_editable(true);

        let cell_a = cell_for(&flow, "a");
        let cell_b = cell_for(&flow, "b");
        cell_a.start_edit();

        cell_b.cancel_edit();
        assert!(cell_a.is_editing());
        assert_eq!(flow.editing_index(), Some(0));
    }
}
