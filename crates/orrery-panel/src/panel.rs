//! The panel: one instance-owned context for scene, camera, scheduler and
//! render resource.

use orrery_scene::{
    AnimationDriver, CameraState, DEFAULT_FIT_PADDING, DEFAULT_PIXEL_RATIO_CAP, OrbitAngle, Rgba,
    SceneBuilder, SceneGraph, ViewportFitter, ViewportSize, render_resolution,
};
use tracing::{debug, error, info, warn};

use crate::backend::{Container, RenderBackend, RenderFault};
use crate::error::PanelError;
use crate::frame::{FrameHandle, FrameScheduler};
use crate::resize::{ResizeCoordinator, ResizeOutcome};
use crate::scheduler::{SchedulerState, Transition, VisibilityScheduler};
use crate::signals::{SignalChange, VisibilitySignals};
use crate::subscription::{NotificationGate, SubscriptionSet, Topic};

/// Validated construction-time options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelOptions {
    background: Rgba,
    fit_padding: f32,
    pixel_ratio_cap: f64,
}

impl PanelOptions {
    /// Options with the given background colour and default padding and cap.
    pub fn new(background_color: &str) -> Result<Self, PanelError> {
        Ok(Self {
            background: Rgba::parse(background_color)?,
            fit_padding: DEFAULT_FIT_PADDING,
            pixel_ratio_cap: DEFAULT_PIXEL_RATIO_CAP,
        })
    }

    /// Padding below 1.0 is accepted, but the scene may then be clipped.
    pub fn with_fit_padding(mut self, fit_padding: f32) -> Self {
        if fit_padding < 1.0 {
            warn!(fit_padding, "Fit padding below 1.0 may clip the scene");
        }
        self.fit_padding = fit_padding;
        self
    }

    pub fn with_pixel_ratio_cap(mut self, pixel_ratio_cap: f64) -> Self {
        self.pixel_ratio_cap = pixel_ratio_cap;
        self
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn fit_padding(&self) -> f32 {
        self.fit_padding
    }

    pub fn pixel_ratio_cap(&self) -> f64 {
        self.pixel_ratio_cap
    }
}

/// The four host-side gates a panel subscribes to. Clones share connection
/// state, so the host keeps one copy and hands another to
/// [`OrreryPanel::attach`].
#[derive(Debug, Clone)]
pub struct PanelGates {
    pub intersection: NotificationGate,
    pub document_visibility: NotificationGate,
    pub motion_preference: NotificationGate,
    pub resize: NotificationGate,
}

impl PanelGates {
    pub fn new() -> Self {
        Self {
            intersection: NotificationGate::new(Topic::Intersection),
            document_visibility: NotificationGate::new(Topic::DocumentVisibility),
            motion_preference: NotificationGate::new(Topic::MotionPreference),
            resize: NotificationGate::new(Topic::Resize),
        }
    }

    /// The gate carrying `change`.
    pub fn for_signal(&self, change: SignalChange) -> &NotificationGate {
        match change {
            SignalChange::Intersection(_) => &self.intersection,
            SignalChange::DocumentVisible(_) => &self.document_visibility,
            SignalChange::ReducedMotion(_) => &self.motion_preference,
        }
    }

    fn subscribe_all(&self) -> SubscriptionSet {
        [
            &self.intersection,
            &self.document_visibility,
            &self.motion_preference,
            &self.resize,
        ]
        .into_iter()
        .map(NotificationGate::subscribe)
        .collect()
    }
}

impl Default for PanelGates {
    fn default() -> Self {
        Self::new()
    }
}

/// An attached panel.
///
/// Created by [`attach`](Self::attach), which builds and frames the scene,
/// acquires the surface, draws the first frame and makes the initial
/// scheduling decision. [`detach`](Self::detach) tears it down; dropping an
/// attached panel detaches it too.
pub struct OrreryPanel<C: Container, F: FrameScheduler> {
    container: Option<C>,
    backend: Option<C::Backend>,
    frames: F,
    graph: SceneGraph,
    camera: CameraState,
    driver: AnimationDriver,
    scheduler: VisibilityScheduler,
    resize: ResizeCoordinator,
    fitter: ViewportFitter,
    pixel_ratio_cap: f64,
    subscriptions: SubscriptionSet,
    render_count: u64,
}

impl<C: Container, F: FrameScheduler> OrreryPanel<C, F> {
    /// Mount the panel into `container`.
    ///
    /// # Errors
    ///
    /// [`PanelError::SurfaceUnavailable`] if the container has no drawable
    /// area or refuses to create a surface, and [`PanelError::RenderFailed`]
    /// if the first frame hits a fatal fault. No animation starts in either
    /// case.
    pub fn attach(
        mut container: C,
        frames: F,
        gates: &PanelGates,
        signals: VisibilitySignals,
        options: PanelOptions,
    ) -> Result<Self, PanelError> {
        let size = container.size().filter(|s| !s.is_empty()).ok_or_else(|| {
            PanelError::SurfaceUnavailable("container has no drawable area".into())
        })?;
        let device_pixel_ratio = container.device_pixel_ratio();

        let builder = SceneBuilder::new(options.background(), options.pixel_ratio_cap());
        let mut setup = builder.build(size, device_pixel_ratio);
        let fitter = ViewportFitter::new(options.fit_padding());
        let fit = fitter.fit_scene(&mut setup.camera, &setup.graph);
        info!(
            width = size.width,
            height = size.height,
            pixel_ratio = setup.pixel_ratio,
            distance = fit.distance,
            near = fit.near,
            far = fit.far,
            "Scene built and framed"
        );

        let backend = container.create_surface(&setup).map_err(|e| {
            error!("Failed to acquire render surface: {e}");
            PanelError::SurfaceUnavailable(Box::new(e))
        })?;

        let mut panel = Self {
            container: Some(container),
            backend: Some(backend),
            frames,
            graph: setup.graph,
            camera: setup.camera,
            driver: AnimationDriver::new(),
            scheduler: VisibilityScheduler::new(signals),
            resize: ResizeCoordinator::new(size, device_pixel_ratio),
            fitter,
            pixel_ratio_cap: options.pixel_ratio_cap(),
            subscriptions: gates.subscribe_all(),
            render_count: 0,
        };

        if let Err(e) = panel.render() {
            panel.detach();
            return Err(e);
        }
        panel.scheduler.reconcile(&mut panel.frames);
        info!(state = ?panel.state(), ?signals, "Panel attached");
        Ok(panel)
    }

    /// React to a visibility input. Stopping draws one final frame of the
    /// state at the stop moment.
    pub fn on_signal(&mut self, change: SignalChange) -> Result<Transition, PanelError> {
        let transition = self.scheduler.update(change, &mut self.frames);
        if let Transition::Stopped { final_render: true } = transition {
            self.render()?;
        }
        Ok(transition)
    }

    /// Run one fired frame callback: advance the animation, draw, and
    /// reschedule while animation should continue. Returns whether the frame
    /// ran; stale or late handles are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Result<bool, PanelError> {
        if !self.scheduler.begin_frame(handle) {
            return Ok(false);
        }
        self.driver.tick(&mut self.graph);
        let rendered = self.render();
        self.scheduler.end_frame(&mut self.frames);
        rendered.map(|()| true)
    }

    /// React to a container size change. Never touches scheduling.
    pub fn on_resize(
        &mut self,
        size: Option<ViewportSize>,
        device_pixel_ratio: f64,
    ) -> ResizeOutcome {
        if self.is_torn_down() {
            debug!(?size, "Resize after detach, ignoring");
            return ResizeOutcome::Ignored;
        }
        let outcome = self.resize.apply(
            size,
            device_pixel_ratio,
            &mut self.camera,
            &self.fitter,
            &self.graph,
        );
        if let ResizeOutcome::Resized { size, .. } = outcome
            && let Some(backend) = self.backend.as_mut()
        {
            let render_size = render_resolution(size, device_pixel_ratio, self.pixel_ratio_cap);
            backend.resize(size, render_size);
        }
        outcome
    }

    /// Redraw the current state without advancing the animation, e.g. when
    /// the platform discarded the last frame.
    pub fn repaint(&mut self) -> Result<(), PanelError> {
        if self.is_torn_down() {
            warn!("Repaint requested after detach, ignoring");
            return Ok(());
        }
        self.render()
    }

    /// Tear down: stop scheduling, detach every observer, then release the
    /// render resource. Returns `false` if already detached.
    pub fn detach(&mut self) -> bool {
        if self.scheduler.is_torn_down() {
            return false;
        }
        self.scheduler.teardown(&mut self.frames);
        let released = self.subscriptions.release_all();
        if let Some(backend) = self.backend.take() {
            backend.dispose();
        }
        self.container = None;
        info!(
            released_subscriptions = released,
            frames_rendered = self.render_count,
            "Panel detached"
        );
        true
    }

    fn render(&mut self) -> Result<(), PanelError> {
        let Some(backend) = self.backend.as_mut() else {
            return Ok(());
        };
        match backend.render(&self.graph, &self.camera) {
            Ok(()) => {
                self.render_count += 1;
                Ok(())
            }
            Err(e) if e.is_fatal() => {
                error!("Fatal render error: {e}");
                Err(PanelError::RenderFailed(Box::new(e)))
            }
            Err(e) => {
                warn!("Skipping frame: {e}");
                Ok(())
            }
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn signals(&self) -> VisibilitySignals {
        self.scheduler.signals()
    }

    pub fn is_torn_down(&self) -> bool {
        self.scheduler.is_torn_down()
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn orbit_angle(&self) -> OrbitAngle {
        self.driver.angle()
    }

    /// Successful draws since attach.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn container(&self) -> Option<&C> {
        self.container.as_ref()
    }

    pub fn backend(&self) -> Option<&C::Backend> {
        self.backend.as_ref()
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    /// The frame scheduler, for hosts that drain fired callbacks from it.
    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.active_count()
    }
}

impl<C: Container, F: FrameScheduler> Drop for OrreryPanel<C, F> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
#[path = "panel_tests.rs"]
mod tests;
