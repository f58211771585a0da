//! The renderer binding seam.
//!
//! The engine is polymorphic over one capability: a visual unit that can be
//! sized and positioned at arbitrary coordinates. Whatever actually draws a
//! cell lives behind the [`Visual`] trait; [`TextVisual`] is the default
//! implementation used by the built-in cell factory and the placeholder.

use std::sync::atomic::{AtomicBool, Ordering};

use flowgrid_core::{Point, Rect, Size};
use parking_lot::RwLock;
use static_assertions::assert_impl_all;

/// A displayable node the engine can size and position.
pub trait Visual: Send + Sync {
    /// Set the node's size.
    fn resize(&self, size: Size);

    /// Move the node to `position` (top-left corner, viewport coordinates).
    fn relocate(&self, position: Point);

    /// Current position and size.
    fn bounds(&self) -> Rect;

    /// Set the node's opacity in `[0, 1]`.
    fn set_opacity(&self, opacity: f32);

    /// Current opacity.
    fn opacity(&self) -> f32;

    /// Ask the host to give this node input focus. Default: no-op.
    fn request_focus(&self) {}
}

/// A plain text node.
///
/// Tracks the geometry the engine assigns plus a text payload; rendering it
/// is the host's concern.
pub struct TextVisual {
    text: RwLock<String>,
    bounds: RwLock<Rect>,
    opacity: RwLock<f32>,
    focused: AtomicBool,
}

impl TextVisual {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: RwLock::new(text.into()),
            bounds: RwLock::new(Rect::ZERO),
            opacity: RwLock::new(1.0),
            focused: AtomicBool::new(false),
        }
    }

    pub fn text(&self) -> String {
        self.text.read().clone()
    }

    pub fn set_text(&self, text: &str) {
        *self.text.write() = text.to_string();
    }

    /// Whether `request_focus` has been observed since the last clear.
    pub fn is_focused(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }

    pub fn clear_focus(&self) {
        self.focused.store(false, Ordering::SeqCst);
    }
}

impl Default for TextVisual {
    fn default() -> Self {
        Self::new("")
    }
}

impl Visual for TextVisual {
    fn resize(&self, size: Size) {
        self.bounds.write().size = size;
    }

    fn relocate(&self, position: Point) {
        self.bounds.write().origin = position;
    }

    fn bounds(&self) -> Rect {
        *self.bounds.read()
    }

    fn set_opacity(&self, opacity: f32) {
        *self.opacity.write() = opacity.clamp(0.0, 1.0);
    }

    fn opacity(&self) -> f32 {
        *self.opacity.read()
    }

    fn request_focus(&self) {
        self.focused.store(true, Ordering::SeqCst);
    }
}

assert_impl_all!(TextVisual: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_and_relocate() {
        let visual = TextVisual::new("hello");
        visual.resize(Size::new(110.0, 50.0));
        visual.relocate(Point::new(115.0, 50.0));

        let bounds = visual.bounds();
        assert_eq!(bounds.size, Size::new(110.0, 50.0));
        assert_eq!(bounds.origin, Point::new(115.0, 50.0));
    }

    #[test]
    fn test_opacity_clamped() {
        let visual = TextVisual::default();
        visual.set_opacity(1.5);
        assert_eq!(visual.opacity(), 1.0);
        visual.set_opacity(-0.5);
        assert_eq!(visual.opacity(), 0.0);
    }

    #[test]
    fn test_focus_tracking() {
        let visual = TextVisual::default();
        assert!(!visual.is_focused());
        visual.request_focus();
        assert!(visual.is_focused());
        visual.clear_focus();
        assert!(!visual.is_focused());
    }
}
