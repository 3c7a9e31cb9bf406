//! Window creation and event routing via winit.
//!
//! Provides [`AppState`], which implements winit's [`ApplicationHandler`] and
//! turns platform events into panel signals, resizes and frame callbacks, and
//! [`run`] to drive it.

use std::sync::Arc;

use orrery_config::Config;
use orrery_panel::{
    FrameQueue, OrreryPanel, PanelError, PanelGates, PanelOptions, SignalChange,
    VisibilitySignals,
};
use orrery_scene::ViewportSize;
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::Key;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::container::WindowContainer;

/// The panel as hosted in a window.
pub type WindowPanel = OrreryPanel<WindowContainer, FrameQueue>;

/// Key that toggles the reduced-motion preference.
pub const REDUCED_MOTION_KEY: &str = "m";

/// Errors that end the host.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error(transparent)]
    Panel(#[from] PanelError),
}

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            f64::from(config.window.width),
            f64::from(config.window.height),
        ))
}

/// Validate the panel section of `config`.
pub fn panel_options_from_config(config: &Config) -> Result<PanelOptions, PanelError> {
    Ok(PanelOptions::new(&config.panel.background_color)?
        .with_fit_padding(config.panel.fit_padding)
        .with_pixel_ratio_cap(config.panel.pixel_ratio_cap))
}

/// A window event the panel cares about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Signal(SignalChange),
    /// Physical size changed at the current scale factor.
    Resized(ViewportSize),
    /// Scale factor changed; the new physical size is read from the window.
    ScaleFactorChanged(f64),
    ToggleReducedMotion,
    Redraw,
    Close,
}

impl HostEvent {
    /// Map a window event, or `None` for events the panel ignores.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::Occluded(occluded) => {
                Some(Self::Signal(SignalChange::Intersection(!occluded)))
            }
            WindowEvent::Resized(size) => {
                Some(Self::Resized(ViewportSize::new(size.width, size.height)))
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                Some(Self::ScaleFactorChanged(*scale_factor))
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && matches!(
                        &event.logical_key,
                        Key::Character(c) if c.eq_ignore_ascii_case(REDUCED_MOTION_KEY)
                    ) =>
            {
                Some(Self::ToggleReducedMotion)
            }
            WindowEvent::RedrawRequested => Some(Self::Redraw),
            WindowEvent::CloseRequested => Some(Self::Close),
            _ => None,
        }
    }
}

/// Application state: the window, the hosted panel and the host's view of
/// the document-visibility and motion signals.
pub struct AppState {
    config: Config,
    options: PanelOptions,
    gates: PanelGates,
    window: Option<Arc<Window>>,
    panel: Option<WindowPanel>,
    document_visible: bool,
    reduced_motion: bool,
    fatal: Option<PanelError>,
}

impl AppState {
    /// # Errors
    ///
    /// [`PanelError::InvalidBackgroundColor`] when the configured colour does
    /// not parse.
    pub fn new(config: Config) -> Result<Self, PanelError> {
        let options = panel_options_from_config(&config)?;
        let reduced_motion = config.motion.reduced_motion;
        Ok(Self {
            config,
            options,
            gates: PanelGates::new(),
            window: None,
            panel: None,
            document_visible: true,
            reduced_motion,
            fatal: None,
        })
    }

    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    pub fn panel(&self) -> Option<&WindowPanel> {
        self.panel.as_ref()
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn document_visible(&self) -> bool {
        self.document_visible
    }

    /// The error that ended the event loop, if any.
    pub fn take_fatal(&mut self) -> Option<PanelError> {
        self.fatal.take()
    }

    fn attach(&mut self, event_loop: &ActiveEventLoop) {
        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let container = WindowContainer::new(Arc::clone(&window));
        let frames = container.frame_queue();
        let signals = VisibilitySignals::at_attach(self.document_visible, self.reduced_motion);
        match OrreryPanel::attach(container, frames, &self.gates, signals, self.options) {
            Ok(panel) => {
                self.panel = Some(panel);
                self.window = Some(window);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    /// Route a signal through its gate; nothing reaches a detached panel.
    fn signal(&mut self, event_loop: &ActiveEventLoop, change: SignalChange) {
        let Some(change) = self.gates.for_signal(change).deliver(change) else {
            debug!(?change, "Signal gate disconnected, dropping");
            return;
        };
        if let Some(panel) = self.panel.as_mut() {
            let result = panel.on_signal(change);
            match result {
                Ok(transition) => debug!(?change, ?transition, "Signal applied"),
                Err(e) => self.fail(event_loop, e),
            }
        }
    }

    fn resize(&mut self, size: ViewportSize, scale_factor: f64) {
        if self.gates.resize.deliver(()).is_none() {
            return;
        }
        if let Some(panel) = self.panel.as_mut() {
            let outcome = panel.on_resize(Some(size), scale_factor);
            debug!(?outcome, "Resize handled");
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        let result = match panel.frames_mut().take_due() {
            Some(handle) => panel.on_frame(handle).map(|_| ()),
            None => panel.repaint(),
        };
        if let Err(e) = result {
            self.fail(event_loop, e);
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: PanelError) {
        error!("Panel failed: {e}");
        self.detach();
        self.fatal = Some(e);
        event_loop.exit();
    }

    fn detach(&mut self) {
        if let Some(mut panel) = self.panel.take() {
            panel.detach();
        }
        self.window = None;
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.document_visible = true;
        if self.panel.is_none() && self.fatal.is_none() {
            self.attach(event_loop);
        } else {
            self.signal(event_loop, SignalChange::DocumentVisible(true));
        }
    }

    fn suspended(&mut self, event_loop: &ActiveEventLoop) {
        self.document_visible = false;
        self.signal(event_loop, SignalChange::DocumentVisible(false));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(host_event) = HostEvent::from_window_event(&event) else {
            return;
        };
        match host_event {
            HostEvent::Signal(change) => self.signal(event_loop, change),
            HostEvent::Resized(size) => {
                let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                self.resize(size, scale_factor);
            }
            HostEvent::ScaleFactorChanged(scale_factor) => {
                if let Some(window) = &self.window {
                    let inner = window.inner_size();
                    self.resize(ViewportSize::new(inner.width, inner.height), scale_factor);
                }
            }
            HostEvent::ToggleReducedMotion => {
                self.reduced_motion = !self.reduced_motion;
                info!(reduced_motion = self.reduced_motion, "Motion preference toggled");
                self.signal(event_loop, SignalChange::ReducedMotion(self.reduced_motion));
            }
            HostEvent::Redraw => self.redraw(event_loop),
            HostEvent::Close => {
                info!("Close requested, shutting down");
                self.detach();
                event_loop.exit();
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.panel.is_some() {
            warn!("Event loop exiting with the panel still attached");
        }
        self.detach();
    }
}

/// Create an event loop and run the host until the window closes.
///
/// # Errors
///
/// [`AppError::Panel`] when the options are invalid or the panel failed
/// fatally, [`AppError::EventLoop`] when the platform event loop did.
#[instrument(skip_all)]
pub fn run(config: Config) -> Result<(), AppError> {
    let mut app = AppState::new(config)?;
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    match app.take_fatal() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn test_app_state_from_default_config() {
        let state = AppState::new(Config::default()).unwrap();
        assert!(state.panel().is_none());
        assert!(state.document_visible());
        assert!(!state.reduced_motion());
        assert!((state.options().fit_padding() - 1.15).abs() < 1e-6);
    }

    #[test]
    fn test_reduced_motion_from_config() {
        let mut config = Config::default();
        config.motion.reduced_motion = true;
        assert!(AppState::new(config).unwrap().reduced_motion());
    }

    #[test]
    fn test_invalid_background_rejected() {
        let mut config = Config::default();
        config.panel.background_color = "#zzzzzz".to_string();
        assert!(matches!(
            AppState::new(config),
            Err(PanelError::InvalidBackgroundColor(_))
        ));
    }

    #[test]
    fn test_panel_options_follow_config() {
        let mut config = Config::default();
        config.panel.fit_padding = 1.4;
        config.panel.pixel_ratio_cap = 1.5;
        let options = panel_options_from_config(&config).unwrap();
        assert!((options.fit_padding() - 1.4).abs() < 1e-6);
        assert_eq!(options.pixel_ratio_cap(), 1.5);
    }

    #[test]
    fn test_occlusion_maps_to_intersection() {
        assert_eq!(
            HostEvent::from_window_event(&WindowEvent::Occluded(true)),
            Some(HostEvent::Signal(SignalChange::Intersection(false)))
        );
        assert_eq!(
            HostEvent::from_window_event(&WindowEvent::Occluded(false)),
            Some(HostEvent::Signal(SignalChange::Intersection(true)))
        );
    }

    #[test]
    fn test_resize_redraw_and_close_mapped() {
        assert_eq!(
            HostEvent::from_window_event(&WindowEvent::Resized(PhysicalSize::new(640, 480))),
            Some(HostEvent::Resized(ViewportSize::new(640, 480)))
        );
        assert_eq!(
            HostEvent::from_window_event(&WindowEvent::RedrawRequested),
            Some(HostEvent::Redraw)
        );
        assert_eq!(
            HostEvent::from_window_event(&WindowEvent::CloseRequested),
            Some(HostEvent::Close)
        );
    }

    #[test]
    fn test_unrelated_events_ignored() {
        assert_eq!(HostEvent::from_window_event(&WindowEvent::Focused(true)), None);
        assert_eq!(HostEvent::from_window_event(&WindowEvent::Destroyed), None);
    }

    #[test]
    fn test_signals_to_detached_gates_are_dropped() {
        let state = AppState::new(Config::default()).unwrap();
        let change = SignalChange::DocumentVisible(false);
        assert_eq!(state.gates.for_signal(change).deliver(change), None);
        assert_eq!(state.gates.resize.deliver(()), None);
    }
}
