//! Container skin: viewport/placeholder swap.
//!
//! The skin shows either the engine's viewport or a placeholder, mutually
//! exclusively, based on whether the collection is currently empty, and
//! cross-dissolves between the two. It tracks the *current* collection
//! instance: when the engine's item list is swapped out, the skin
//! re-subscribes to the new one.

use std::hash::Hash;
use std::sync::{Arc, Weak};

use flowgrid_core::logging::targets;
use flowgrid_core::ConnectionGuard;
use parking_lot::{Mutex, RwLock};
use static_assertions::assert_impl_all;

use super::animation::{FadeState, FadeTransition};
use super::virtual_flow::VirtualFlow;
use super::visual::{TextVisual, Visual};
use crate::model::ItemList;

/// Which of the two faces the skin is currently presenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinFace {
    /// The engine's scrollable cell viewport.
    Viewport,
    /// The empty-collection placeholder.
    Placeholder,
}

/// Guards must drop before the `Arc` they borrow from; field order enforces
/// it.
struct SkinListSubscription<T: Clone + Send + 'static> {
    _inserted: ConnectionGuard<(usize, usize)>,
    _removed: ConnectionGuard<(usize, Vec<T>)>,
    _reset: ConnectionGuard<()>,
    _list: Arc<ItemList<T>>,
}

/// The container skin.
///
/// Purely compositional: it owns no cell or selection state, only the
/// face swap and the placeholder node.
pub struct GridListSkin<T>
where
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    weak_self: Weak<GridListSkin<T>>,

    // Declared before `flow`: the guard points into the flow's signal and
    // must drop first.
    items_replaced_guard: Mutex<Option<ConnectionGuard<()>>>,
    flow: Arc<VirtualFlow<T>>,

    placeholder: RwLock<Arc<dyn Visual>>,
    face: RwLock<SkinFace>,
    fade: Mutex<FadeTransition>,
    viewport_opacity: RwLock<f32>,

    list_subscription: Mutex<Option<SkinListSubscription<T>>>,
}

impl<T> GridListSkin<T>
where
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    /// Text of the built-in placeholder.
    pub const DEFAULT_PLACEHOLDER_TEXT: &'static str = "No items available";

    /// Creates a skin over `flow`, with the default text placeholder.
    pub fn new(flow: Arc<VirtualFlow<T>>) -> Arc<Self> {
        let empty = flow.items().is_empty();
        let placeholder: Arc<dyn Visual> =
            Arc::new(TextVisual::new(Self::DEFAULT_PLACEHOLDER_TEXT));
        placeholder.set_opacity(if empty { 1.0 } else { 0.0 });

        let skin = Arc::new_cyclic(|weak| Self {
            weak_self: weak.clone(),
            items_replaced_guard: Mutex::new(None),
            flow,
            placeholder: RwLock::new(placeholder),
            face: RwLock::new(if empty {
                SkinFace::Placeholder
            } else {
                SkinFace::Viewport
            }),
            fade: Mutex::new(FadeTransition::new()),
            viewport_opacity: RwLock::new(if empty { 0.0 } else { 1.0 }),
            list_subscription: Mutex::new(None),
        });

        skin.subscribe_to_list();

        let weak = skin.weak_self.clone();
        let guard = skin.flow.items_replaced.connect_scoped(move |_| {
            if let Some(skin) = weak.upgrade() {
                skin.subscribe_to_list();
                skin.refresh_face();
            }
        });
        *skin.items_replaced_guard.lock() = Some(guard);

        skin
    }

    fn subscribe_to_list(&self) {
        let list = self.flow.items();

        let weak = self.weak_self.clone();
        let inserted = list.signals.rows_inserted.connect_scoped(move |_| {
            if let Some(skin) = weak.upgrade() {
                skin.refresh_face();
            }
        });

        let weak = self.weak_self.clone();
        let removed = list.signals.rows_removed.connect_scoped(move |_| {
            if let Some(skin) = weak.upgrade() {
                skin.refresh_face();
            }
        });

        let weak = self.weak_self.clone();
        let reset = list.signals.reset.connect_scoped(move |_| {
            if let Some(skin) = weak.upgrade() {
                skin.refresh_face();
            }
        });

        *self.list_subscription.lock() = Some(SkinListSubscription {
            _inserted: inserted,
            _removed: removed,
            _reset: reset,
            _list: list,
        });
    }

    /// The engine this skin composes.
    pub fn flow(&self) -> &Arc<VirtualFlow<T>> {
        &self.flow
    }

    /// Which face is presented for the collection's current emptiness.
    ///
    /// The face flips synchronously with the collection change; the fade is
    /// only the visual settling between the two.
    pub fn current_face(&self) -> SkinFace {
        *self.face.read()
    }

    /// The placeholder node shown when the collection is empty.
    pub fn placeholder(&self) -> Arc<dyn Visual> {
        Arc::clone(&self.placeholder.read())
    }

    /// Replaces the placeholder node, carrying the current opacity over.
    pub fn set_placeholder(&self, placeholder: Arc<dyn Visual>) {
        let opacity = self.placeholder.read().opacity();
        placeholder.set_opacity(opacity);
        *self.placeholder.write() = placeholder;
    }

    /// Opacity the host should apply to the engine's viewport.
    pub fn viewport_opacity(&self) -> f32 {
        *self.viewport_opacity.read()
    }

    /// Advances the fade one frame.
    pub fn tick(&self) {
        let state = self.fade.lock().update();
        match state {
            FadeState::Running(progress) => self.apply_opacity(progress),
            FadeState::Finished => self.apply_opacity(1.0),
            FadeState::Idle | FadeState::Waiting => {}
        }
    }

    /// Whether the cross-dissolve is still settling.
    pub fn is_fading(&self) -> bool {
        self.fade.lock().is_running()
    }

    fn refresh_face(&self) {
        let target = if self.flow.items().is_empty() {
            SkinFace::Placeholder
        } else {
            SkinFace::Viewport
        };
        let changed = {
            let mut face = self.face.write();
            if *face != target {
                *face = target;
                true
            } else {
                false
            }
        };
        if changed {
            tracing::debug!(target: targets::SKIN, ?target, "face swap");
            self.fade.lock().start();
        }
    }

    fn apply_opacity(&self, progress: f32) {
        let (viewport, placeholder) = match self.current_face() {
            SkinFace::Viewport => (progress, 1.0 - progress),
            SkinFace::Placeholder => (1.0 - progress, progress),
        };
        *self.viewport_opacity.write() = viewport;
        self.placeholder.read().set_opacity(placeholder);
    }
}

assert_impl_all!(GridListSkin<String>: Send, Sync);
