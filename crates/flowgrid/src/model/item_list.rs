//! Observable item collection.
//!
//! `ItemList<T>` is the ordered, mutable backing collection of the widget.
//! Every mutating operation publishes a signal after the mutation is visible,
//! so a handler that reads the list from inside a notification always
//! observes the post-mutation state.

use std::sync::Arc;

use flowgrid_core::logging::targets;
use flowgrid_core::Signal;
use parking_lot::RwLock;
use static_assertions::assert_impl_all;

/// Change notifications emitted by an [`ItemList`].
///
/// Handlers run synchronously, after the mutation has been applied and the
/// data lock released.
pub struct ListSignals<T> {
    /// `(start, count)` — `count` items were inserted beginning at `start`.
    pub rows_inserted: Signal<(usize, usize)>,
    /// `(start, removed)` — the given items were removed beginning at `start`.
    ///
    /// The removed values are carried in the payload so subscribers can evict
    /// per-item state (cells, selection entries) without an index lookup into
    /// the already-mutated list.
    pub rows_removed: Signal<(usize, Vec<T>)>,
    /// `(index, old)` — the item at `index` was replaced; `old` is the value
    /// it held before the replacement.
    pub row_replaced: Signal<(usize, T)>,
    /// The whole collection changed (cleared or replaced wholesale).
    pub reset: Signal<()>,
}

impl<T: Clone + Send + 'static> ListSignals<T> {
    pub fn new() -> Self {
        Self {
            rows_inserted: Signal::new(),
            rows_removed: Signal::new(),
            row_replaced: Signal::new(),
            reset: Signal::new(),
        }
    }
}

impl<T: Clone + Send + 'static> Default for ListSignals<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered, observable collection of items.
///
/// All operations are total: out-of-range indices are clamped (insert) or
/// answered with `None` (remove, replace, get) rather than panicking.
///
/// Equality-based lookups (`index_of`, `contains`) resolve to the first
/// matching element; collections holding duplicate-equal items therefore
/// get ambiguous index resolution. This is a documented limitation of the
/// value-identity design, not silently papered over.
///
/// # Example
///
/// ```
/// use flowgrid::ItemList;
///
/// let list = ItemList::from_items(vec!["a".to_string(), "b".to_string()]);
/// list.push("c".to_string());
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.index_of(&"b".to_string()), Some(1));
/// ```
pub struct ItemList<T> {
    items: RwLock<Vec<T>>,
    /// Change notifications, public so collaborators can subscribe directly.
    pub signals: ListSignals<T>,
}

impl<T> ItemList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Creates an empty list.
    pub fn new() -> Arc<Self> {
        Self::from_items(Vec::new())
    }

    /// Creates a list seeded with the given items.
    pub fn from_items(items: Vec<T>) -> Arc<Self> {
        Arc::new(Self {
            items: RwLock::new(items),
            signals: ListSignals::new(),
        })
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Returns a clone of the item at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.read().get(index).cloned()
    }

    /// Returns the index of the first item equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items.read().iter().position(|it| it == item)
    }

    /// Returns `true` if an item equal to `item` is present.
    pub fn contains(&self, item: &T) -> bool {
        self.items.read().iter().any(|it| it == item)
    }

    /// Returns a clone of the first item, if any.
    pub fn first(&self) -> Option<T> {
        self.items.read().first().cloned()
    }

    /// Returns a clone of the last item, if any.
    pub fn last(&self) -> Option<T> {
        self.items.read().last().cloned()
    }

    /// Read access to the items through a closure, without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[T]) -> R,
    {
        f(&self.items.read())
    }

    /// Returns a snapshot of all items.
    pub fn items(&self) -> Vec<T> {
        self.items.read().clone()
    }

    /// Appends an item to the end of the list.
    pub fn push(&self, item: T) {
        let start = {
            let mut items = self.items.write();
            items.push(item);
            items.len() - 1
        };
        tracing::trace!(target: targets::MODEL, start, "rows inserted");
        self.signals.rows_inserted.emit((start, 1));
    }

    /// Inserts an item at `index`, clamping to the end of the list.
    pub fn insert(&self, index: usize, item: T) {
        let start = {
            let mut items = self.items.write();
            let index = index.min(items.len());
            items.insert(index, item);
            index
        };
        tracing::trace!(target: targets::MODEL, start, "rows inserted");
        self.signals.rows_inserted.emit((start, 1));
    }

    /// Removes and returns the item at `index`, or `None` if out of range.
    pub fn remove(&self, index: usize) -> Option<T> {
        let removed = {
            let mut items = self.items.write();
            if index >= items.len() {
                return None;
            }
            items.remove(index)
        };
        tracing::trace!(target: targets::MODEL, start = index, "rows removed");
        self.signals
            .rows_removed
            .emit((index, vec![removed.clone()]));
        Some(removed)
    }

    /// Removes the first item equal to `item`; returns its former index.
    pub fn remove_item(&self, item: &T) -> Option<usize> {
        let index = self.index_of(item)?;
        self.remove(index)?;
        Some(index)
    }

    /// Replaces the item at `index`, returning the old value.
    ///
    /// Out-of-range indices are a no-op returning `None`.
    pub fn replace(&self, index: usize, item: T) -> Option<T> {
        let old = {
            let mut items = self.items.write();
            let slot = items.get_mut(index)?;
            std::mem::replace(slot, item)
        };
        tracing::trace!(target: targets::MODEL, index, "row replaced");
        self.signals.row_replaced.emit((index, old.clone()));
        Some(old)
    }

    /// Removes all items.
    pub fn clear(&self) {
        self.items.write().clear();
        tracing::debug!(target: targets::MODEL, "list cleared");
        self.signals.reset.emit(());
    }

    /// Replaces the whole collection.
    pub fn set_items(&self, items: Vec<T>) {
        *self.items.write() = items;
        tracing::debug!(target: targets::MODEL, count = self.len(), "list replaced");
        self.signals.reset.emit(());
    }
}

assert_impl_all!(ItemList<String>: Send, Sync);
