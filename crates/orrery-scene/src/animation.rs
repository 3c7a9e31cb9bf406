//! Per-tick orbital animation.

use glam::Quat;

use crate::graph::SceneGraph;

/// Radians added to the orbit angle on every tick.
pub const ORBIT_STEP: f64 = 0.003;
/// Peak vertical displacement of the moon around its baseline.
pub const MOON_BOB_AMPLITUDE: f32 = 0.18;
/// Resting height of the moon inside the orbit node.
pub const MOON_BASELINE_Y: f32 = 1.1;

/// Accumulated orbit angle in radians.
///
/// Only its sine and cosine are consumed, so it grows without bound. It is
/// kept in f64 so long sessions do not accumulate visible drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct OrbitAngle(f64);

impl OrbitAngle {
    pub fn radians(self) -> f64 {
        self.0
    }

    fn advance(&mut self, step: f64) {
        self.0 += step;
    }
}

/// Advances the orbit and poses the moon. Never renders.
#[derive(Debug, Clone, Default)]
pub struct AnimationDriver {
    angle: OrbitAngle,
    ticks: u64,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle(&self) -> OrbitAngle {
        self.angle
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Moon height for a given orbit angle.
    pub fn moon_height(angle: OrbitAngle) -> f32 {
        MOON_BASELINE_Y + MOON_BOB_AMPLITUDE * ((angle.radians() * 0.5).sin() as f32)
    }

    /// Advance one step and write the new pose into `graph`.
    pub fn tick(&mut self, graph: &mut SceneGraph) {
        self.angle.advance(ORBIT_STEP);
        self.ticks += 1;
        self.pose(graph);
    }

    /// Write the pose for the current angle without advancing.
    pub fn pose(&self, graph: &mut SceneGraph) {
        graph.set_moon_orbit_rotation(Quat::from_rotation_y(self.angle.radians() as f32));
        graph.set_moon_height(Self::moon_height(self.angle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SceneBuilder;
    use crate::graph::NodeId;
    use crate::viewport::ViewportSize;

    fn graph() -> SceneGraph {
        SceneBuilder::default()
            .build(ViewportSize::new(800, 600), 1.0)
            .graph
    }

    fn rotation_angle(q: Quat) -> f32 {
        let (axis, angle) = q.to_axis_angle();
        angle * axis.y.signum()
    }

    #[test]
    fn test_n_ticks_advance_angle_linearly() {
        let mut graph = graph();
        let mut driver = AnimationDriver::new();
        for _ in 0..1000 {
            driver.tick(&mut graph);
        }
        assert_eq!(driver.ticks(), 1000);
        assert!((driver.angle().radians() - 3.0).abs() < 1e-9);
        let expected_y = 1.1 + 0.18 * (0.0015_f64 * 1000.0).sin();
        assert!((f64::from(graph.moon_height()) - expected_y).abs() < 1e-5);
    }

    #[test]
    fn test_hundred_ticks_scenario() {
        let mut graph = graph();
        let mut driver = AnimationDriver::new();
        for _ in 0..100 {
            driver.tick(&mut graph);
        }
        assert!((rotation_angle(graph.moon_orbit_rotation()) - 0.3).abs() < 1e-4);
        let expected_y = 1.1 + 0.18 * 0.15_f32.sin();
        assert!((graph.moon_height() - expected_y).abs() < 1e-5);
    }

    #[test]
    fn test_tick_leaves_planet_group_in_place() {
        let mut graph = graph();
        let before = graph.planet_position();
        let mut driver = AnimationDriver::new();
        driver.tick(&mut graph);
        assert_eq!(graph.planet_position(), before);
        assert_eq!(graph.node(NodeId::Ring).transform.translation, before);
        assert_eq!(graph.node(NodeId::MoonOrbit).transform.translation, before);
    }

    #[test]
    fn test_pose_without_advance() {
        let mut graph = graph();
        let driver = AnimationDriver::new();
        driver.pose(&mut graph);
        assert_eq!(driver.ticks(), 0);
        assert!((graph.moon_height() - MOON_BASELINE_Y).abs() < 1e-6);
    }

    #[test]
    fn test_angle_is_monotonic() {
        let mut graph = graph();
        let mut driver = AnimationDriver::new();
        let mut last = driver.angle();
        for _ in 0..50 {
            driver.tick(&mut graph);
            assert!(driver.angle() > last);
            last = driver.angle();
        }
    }
}
