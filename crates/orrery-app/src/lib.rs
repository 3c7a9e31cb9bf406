//! Desktop host for the orrery panel.
//!
//! A winit window plays the part of the page panel: window occlusion,
//! application suspension and a keyboard toggle drive the three visibility
//! signals, and redraw requests carry frame callbacks.

pub mod container;
pub mod platform;
pub mod window;
