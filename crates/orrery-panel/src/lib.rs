//! Render lifecycle for the Orrery panel.
//!
//! [`OrreryPanel`] owns the scene, the camera and the render backend, and
//! decides frame by frame whether anything is drawn at all. Rendering runs
//! only while the panel is on screen, the document is visible, and the user
//! has not asked for reduced motion. Everything platform-specific sits behind
//! the [`Container`], [`RenderBackend`] and [`FrameScheduler`] traits; signals
//! arrive through [`NotificationGate`]s.
//!
//! All types are single-threaded and expect to live on the event-loop thread.

mod backend;
mod error;
mod frame;
mod panel;
mod resize;
mod scheduler;
mod signals;
mod subscription;

pub use backend::{Container, RenderBackend, RenderFault};
pub use error::PanelError;
pub use frame::{FrameHandle, FrameQueue, FrameScheduler};
pub use panel::{OrreryPanel, PanelGates, PanelOptions};
pub use resize::{ResizeCoordinator, ResizeOutcome};
pub use scheduler::{SchedulerState, Transition, VisibilityScheduler};
pub use signals::{SignalChange, VisibilitySignals};
pub use subscription::{NotificationGate, Subscription, SubscriptionSet, Topic};
