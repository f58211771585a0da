//! Animation support for scroll easing and the skin's fade swap.

mod easing;
mod transition;

pub use easing::{ease, lerp_eased, Easing};
pub use transition::{AnimationState, FadeState, FadeTransition, ScrollAnimation};
