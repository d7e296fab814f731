//! Orbit nodes - per-item positions around the anchor
//!
//! Each labeled item sits at a fixed base angle `2π·index/total`.
//! - Float: stays at its base angle and bobs vertically
//! - Orbit: revolves at 0.5 rad/s, phase-separated by the base angle

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::error::SceneError;

/// Vertical bob of the float variant
const FLOAT_BOB_FREQ: f64 = 2.0;
const FLOAT_BOB_AMPLITUDE: f64 = 0.1;
/// Height of the figure-eight the float ring is laid out on
const FLOAT_WAVE_HEIGHT: f64 = 1.0;

/// Angular speed of the orbit variant (rad/s)
pub const ORBIT_ANGULAR_SPEED: f64 = 0.5;
const ORBIT_BOB_FREQ: f64 = 2.0;
const ORBIT_BOB_AMPLITUDE: f64 = 0.8;

/// Self-spin of orbit-variant items, radians per tick
pub const ORBIT_SPIN_PER_TICK: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Float,
    Orbit,
}

/// Position of one node, rewritten every frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OrbitTransform {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl OrbitTransform {
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Distance from the anchor's vertical axis
    pub fn horizontal_radius(&self) -> f64 {
        self.x.hypot(self.z)
    }
}

/// Kinematic unit for one labeled item
#[derive(Debug, Clone)]
pub struct OrbitNode {
    index: usize,
    total: usize,
    radius: f64,
    variant: Variant,
    base_angle: f64,
    transform: OrbitTransform,
    spin: f64,
}

impl OrbitNode {
    pub fn new(index: usize, total: usize, radius: f64, variant: Variant) -> Result<Self, SceneError> {
        if total == 0 {
            return Err(SceneError::EmptyScene);
        }
        if index >= total {
            return Err(SceneError::IndexOutOfRange { index, total });
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SceneError::InvalidRadius(radius));
        }

        let base_angle = TAU * index as f64 / total as f64;
        let mut node = Self {
            index,
            total,
            radius,
            variant,
            base_angle,
            transform: OrbitTransform::default(),
            spin: 0.0,
        };
        node.transform = node.position_at(0.0);
        Ok(node)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn base_angle(&self) -> f64 {
        self.base_angle
    }

    /// Transform as of the last update
    pub fn transform(&self) -> OrbitTransform {
        self.transform
    }

    /// Accumulated self-spin (orbit variant only, zero otherwise)
    pub fn spin(&self) -> f64 {
        self.spin
    }

    /// Position at `elapsed` seconds; pure, touches no node state
    pub fn position_at(&self, elapsed: f64) -> OrbitTransform {
        let theta = self.base_angle;
        let r = self.radius;
        match self.variant {
            Variant::Float => {
                let x = theta.cos() * r;
                let z = theta.sin() * r;
                let base_y = (theta * 2.0).sin() * FLOAT_WAVE_HEIGHT;
                // Phase keyed off x, so neighbours bob out of sync
                let bob = (elapsed * FLOAT_BOB_FREQ + x).sin() * FLOAT_BOB_AMPLITUDE;
                OrbitTransform { x, y: base_y + bob, z }
            }
            Variant::Orbit => {
                let phi = elapsed * ORBIT_ANGULAR_SPEED + theta;
                OrbitTransform {
                    x: phi.cos() * r,
                    y: (elapsed * ORBIT_BOB_FREQ + theta).sin() * ORBIT_BOB_AMPLITUDE,
                    z: phi.sin() * r,
                }
            }
        }
    }

    /// Recompute the owned transform for this frame.
    /// `spin_scale` multiplies the per-tick spin (1.0 for a plain tick).
    pub fn update(&mut self, elapsed: f64, spin_scale: f64) -> OrbitTransform {
        self.transform = self.position_at(elapsed);
        if self.variant == Variant::Orbit {
            self.spin = (self.spin + ORBIT_SPIN_PER_TICK * spin_scale).rem_euclid(TAU);
        }
        self.transform
    }
}

/// One-shot form of [`OrbitNode::position_at`]
pub fn orbit_position(
    index: usize,
    total: usize,
    radius: f64,
    elapsed: f64,
    variant: Variant,
) -> Result<OrbitTransform, SceneError> {
    Ok(OrbitNode::new(index, total, radius, variant)?.position_at(elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_float_first_item_on_x_axis() {
        let p = orbit_position(0, 8, 4.0, 0.0, Variant::Float).unwrap();
        assert_eq!(p.x, 4.0);
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn test_float_quarter_turn() {
        let p = orbit_position(2, 8, 4.0, 0.0, Variant::Float).unwrap();
        assert!(p.x.abs() < EPS, "x = {}", p.x);
        assert!((p.z - 4.0).abs() < EPS, "z = {}", p.z);
    }

    #[test]
    fn test_float_bob_stays_small() {
        let node = OrbitNode::new(3, 8, 4.0, Variant::Float).unwrap();
        let base_y = (node.base_angle() * 2.0).sin();
        for step in 0..500 {
            let p = node.position_at(step as f64 * 0.037);
            assert!((p.y - base_y).abs() <= FLOAT_BOB_AMPLITUDE + EPS);
            assert!((p.horizontal_radius() - 4.0).abs() < EPS);
        }
    }

    #[test]
    fn test_float_nodes_bob_out_of_sync() {
        let a = OrbitNode::new(0, 8, 4.0, Variant::Float).unwrap();
        let b = OrbitNode::new(4, 8, 4.0, Variant::Float).unwrap();
        let bob = |n: &OrbitNode, t: f64| n.position_at(t).y - n.position_at(0.0).y;
        // Opposite nodes have x = +4 and -4, so their bob phases differ
        assert!((bob(&a, 0.3) - bob(&b, 0.3)).abs() > 1e-3);
    }

    #[test]
    fn test_orbit_periodicity() {
        let period = TAU / ORBIT_ANGULAR_SPEED;
        assert!((period - 4.0 * PI).abs() < 1e-12);
        for index in 0..12 {
            let start = orbit_position(index, 12, 4.0, 0.0, Variant::Orbit).unwrap();
            let later = orbit_position(index, 12, 4.0, period, Variant::Orbit).unwrap();
            assert!((start.x - later.x).abs() < EPS);
            assert!((start.z - later.z).abs() < EPS);
        }
    }

    #[test]
    fn test_orbit_keeps_radius_and_spacing() {
        let total = 12;
        let t = 7.25;
        let nodes: Vec<_> = (0..total)
            .map(|i| OrbitNode::new(i, total, 4.0, Variant::Orbit).unwrap())
            .collect();
        let angles: Vec<f64> = nodes
            .iter()
            .map(|n| {
                let p = n.position_at(t);
                assert!((p.horizontal_radius() - 4.0).abs() < EPS);
                p.z.atan2(p.x)
            })
            .collect();
        let spacing = TAU / total as f64;
        for w in angles.windows(2) {
            let gap = (w[1] - w[0]).rem_euclid(TAU);
            assert!((gap - spacing).abs() < EPS, "gap {}", gap);
        }
    }

    #[test]
    fn test_orbit_bob_amplitude() {
        let node = OrbitNode::new(5, 12, 4.0, Variant::Orbit).unwrap();
        for step in 0..400 {
            assert!(node.position_at(step as f64 * 0.05).y.abs() <= ORBIT_BOB_AMPLITUDE + EPS);
        }
    }

    #[test]
    fn test_zero_total_fails() {
        assert_eq!(
            OrbitNode::new(0, 0, 4.0, Variant::Float).unwrap_err(),
            SceneError::EmptyScene
        );
        assert!(orbit_position(0, 0, 4.0, 1.0, Variant::Orbit).is_err());
    }

    #[test]
    fn test_bad_index_and_radius_fail() {
        assert_eq!(
            OrbitNode::new(8, 8, 4.0, Variant::Float).unwrap_err(),
            SceneError::IndexOutOfRange { index: 8, total: 8 }
        );
        assert!(OrbitNode::new(0, 8, -4.0, Variant::Float).is_err());
        assert!(OrbitNode::new(0, 8, 0.0, Variant::Orbit).is_err());
        assert!(OrbitNode::new(0, 8, f64::INFINITY, Variant::Orbit).is_err());
    }

    #[test]
    fn test_deterministic() {
        for variant in [Variant::Float, Variant::Orbit] {
            let a = orbit_position(3, 7, 4.0, 12.345, variant).unwrap();
            let b = orbit_position(3, 7, 4.0, 12.345, variant).unwrap();
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
            assert_eq!(a.z.to_bits(), b.z.to_bits());
        }
    }

    #[test]
    fn test_update_matches_pure_position() {
        let mut node = OrbitNode::new(1, 4, 4.0, Variant::Orbit).unwrap();
        let expected = node.position_at(2.5);
        assert_eq!(node.update(2.5, 1.0), expected);
        assert_eq!(node.transform(), expected);
        assert!((node.spin() - ORBIT_SPIN_PER_TICK).abs() < 1e-12);
    }

    #[test]
    fn test_float_nodes_do_not_spin() {
        let mut node = OrbitNode::new(1, 4, 4.0, Variant::Float).unwrap();
        node.update(1.0, 1.0);
        node.update(2.0, 1.0);
        assert_eq!(node.spin(), 0.0);
    }

    #[test]
    fn test_spin_follows_scale() {
        let mut node = OrbitNode::new(0, 4, 4.0, Variant::Orbit).unwrap();
        node.update(0.5, 0.5);
        node.update(1.0, 2.0);
        assert!((node.spin() - ORBIT_SPIN_PER_TICK * 2.5).abs() < 1e-12);
        // A zero scale still moves the node but leaves its spin alone
        node.update(1.5, 0.0);
        assert!((node.spin() - ORBIT_SPIN_PER_TICK * 2.5).abs() < 1e-12);
        assert_eq!(node.transform(), node.position_at(1.5));
    }
}
