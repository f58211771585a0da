//! Selection state for the widget.
//!
//! The selection model owns the canonical set of selected items. Cells mirror
//! this state but never own it; the windowing engine subscribes to
//! [`SelectionModel::selection_changed`] and pushes the mirrored flags into
//! the affected cells.

use std::sync::Arc;

use flowgrid_core::logging::targets;
use flowgrid_core::Signal;
use parking_lot::RwLock;
use static_assertions::assert_impl_all;

/// Cardinality policy for the selection set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// At most one item selected; a new selection replaces the prior one.
    #[default]
    Single,
    /// Any number of items selected; selection is additive.
    Multiple,
}

/// An insertion-ordered set of selected items.
///
/// Iteration order is the order in which items were selected, which keeps
/// observer notifications deterministic. No item appears twice.
///
/// # Example
///
/// ```
/// use flowgrid::{SelectionMode, SelectionModel};
///
/// let model = SelectionModel::new();
/// model.set_mode(SelectionMode::Multiple);
/// model.select(1);
/// model.select(2);
/// model.select(2); // idempotent
/// assert_eq!(model.selected_items(), vec![1, 2]);
/// ```
pub struct SelectionModel<T> {
    mode: RwLock<SelectionMode>,
    selected: RwLock<Vec<T>>,
    /// Emitted after every mutation with `(newly_selected, newly_deselected)`.
    pub selection_changed: Signal<(Vec<T>, Vec<T>)>,
}

impl<T> SelectionModel<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Creates an empty selection in [`SelectionMode::Single`].
    pub fn new() -> Arc<Self> {
        Self::with_mode(SelectionMode::Single)
    }

    /// Creates an empty selection with the given mode.
    pub fn with_mode(mode: SelectionMode) -> Arc<Self> {
        Arc::new(Self {
            mode: RwLock::new(mode),
            selected: RwLock::new(Vec::new()),
            selection_changed: Signal::new(),
        })
    }

    /// Returns the current selection mode.
    pub fn mode(&self) -> SelectionMode {
        *self.mode.read()
    }

    /// Changes the selection mode.
    ///
    /// Switching to [`SelectionMode::Single`] while several items are
    /// selected keeps only the earliest-selected item, restoring the
    /// cardinality invariant immediately.
    pub fn set_mode(&self, mode: SelectionMode) {
        let dropped = {
            let mut current = self.mode.write();
            if *current == mode {
                return;
            }
            *current = mode;

            let mut selected = self.selected.write();
            if mode == SelectionMode::Single && selected.len() > 1 {
                selected.split_off(1)
            } else {
                Vec::new()
            }
        };
        tracing::debug!(target: targets::SELECTION, ?mode, "selection mode changed");
        if !dropped.is_empty() {
            self.selection_changed.emit((Vec::new(), dropped));
        }
    }

    /// Selects `item`.
    ///
    /// In `Single` mode the prior selection is cleared first; in `Multiple`
    /// mode the item is added if absent (no-op when already selected).
    pub fn select(&self, item: T) {
        let (added, removed) = {
            let mode = *self.mode.read();
            let mut selected = self.selected.write();
            match mode {
                SelectionMode::Single => {
                    if selected.as_slice() == std::slice::from_ref(&item) {
                        (Vec::new(), Vec::new())
                    } else {
                        let was_selected = selected.contains(&item);
                        let removed: Vec<T> =
                            selected.drain(..).filter(|it| *it != item).collect();
                        selected.push(item.clone());
                        let added = if was_selected { Vec::new() } else { vec![item] };
                        (added, removed)
                    }
                }
                SelectionMode::Multiple => {
                    if selected.contains(&item) {
                        (Vec::new(), Vec::new())
                    } else {
                        selected.push(item.clone());
                        (vec![item], Vec::new())
                    }
                }
            }
        };
        self.notify(added, removed);
    }

    /// Replaces the entire selection with `items`.
    ///
    /// Listeners observe one coherent replacement: a single notification
    /// carrying both the net additions and the net removals. Items already
    /// selected stay selected without being re-reported. In `Single` mode
    /// only the first item of `items` is kept.
    pub fn select_items(&self, items: &[T]) {
        let (added, removed) = {
            let mode = *self.mode.read();
            let mut new_selection: Vec<T> = Vec::new();
            for item in items {
                if !new_selection.contains(item) {
                    new_selection.push(item.clone());
                }
            }
            if mode == SelectionMode::Single {
                new_selection.truncate(1);
            }

            let mut selected = self.selected.write();
            let removed: Vec<T> = selected
                .iter()
                .filter(|it| !new_selection.contains(it))
                .cloned()
                .collect();
            let added: Vec<T> = new_selection
                .iter()
                .filter(|it| !selected.contains(it))
                .cloned()
                .collect();
            *selected = new_selection;
            (added, removed)
        };
        self.notify(added, removed);
    }

    /// Removes `item` from the selection; no-op if absent.
    ///
    /// Returns `true` if the item had been selected.
    pub fn unselect(&self, item: &T) -> bool {
        let removed = {
            let mut selected = self.selected.write();
            match selected.iter().position(|it| it == item) {
                Some(pos) => Some(selected.remove(pos)),
                None => None,
            }
        };
        match removed {
            Some(it) => {
                self.notify(Vec::new(), vec![it]);
                true
            }
            None => false,
        }
    }

    /// Empties the selection.
    pub fn clear(&self) {
        let removed = {
            let mut selected = self.selected.write();
            std::mem::take(&mut *selected)
        };
        self.notify(Vec::new(), removed);
    }

    /// Returns `true` if `item` is currently selected.
    pub fn is_selected(&self, item: &T) -> bool {
        self.selected.read().contains(item)
    }

    /// Returns a snapshot of the selected items in selection order.
    pub fn selected_items(&self) -> Vec<T> {
        self.selected.read().clone()
    }

    /// Read access to the selected items through a closure.
    pub fn with_selected<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[T]) -> R,
    {
        f(&self.selected.read())
    }

    /// Returns the earliest-selected item, if any.
    pub fn first_selected(&self) -> Option<T> {
        self.selected.read().first().cloned()
    }

    /// Number of selected items.
    pub fn len(&self) -> usize {
        self.selected.read().len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.read().is_empty()
    }

    fn notify(&self, added: Vec<T>, removed: Vec<T>) {
        if added.is_empty() && removed.is_empty() {
            return;
        }
        tracing::trace!(
            target: targets::SELECTION,
            added = added.len(),
            removed = removed.len(),
            "selection changed"
        );
        self.selection_changed.emit((added, removed));
    }
}

assert_impl_all!(SelectionModel<String>: Send, Sync);
