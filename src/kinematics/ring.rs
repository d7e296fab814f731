//! Ring paths - closed polylines approximating tilted circles
//!
//! Computed once when a scene is built; never touched per frame.

use serde::Serialize;
use std::f64::consts::{PI, TAU};

use crate::error::SceneError;
use crate::kinematics::Vec3;

/// Segments per decorative ring
pub const RING_SEGMENTS: usize = 64;
/// Rings around an atom anchor
pub const RING_COUNT: usize = 3;

/// Closed polyline of `segments + 1` points; the last point repeats the first
///
/// With `tilt = 0` the ring lies flat in the x-z plane.
pub fn ring_path(radius: f64, segments: usize, tilt: f64) -> Result<Vec<Vec3>, SceneError> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(SceneError::InvalidRadius(radius));
    }
    if segments == 0 {
        return Err(SceneError::InvalidSegmentCount(segments));
    }

    let (tilt_sin, tilt_cos) = tilt.sin_cos();
    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..segments {
        let angle = TAU * i as f64 / segments as f64;
        let (s, c) = angle.sin_cos();
        points.push([c * radius, s * radius * tilt_sin, s * radius * tilt_cos]);
    }
    // Closing point copied rather than recomputed at 2π, so closure is exact
    points.push(points[0]);

    Ok(points)
}

/// Tilt of ring `ring_index` around an atom: `r·π/3`
pub fn ring_tilt(ring_index: usize) -> f64 {
    ring_index as f64 * PI / 3.0
}

/// Decorative wireframe ring with its precomputed polyline
#[derive(Debug, Clone, Serialize)]
pub struct Ring {
    pub ring_index: usize,
    pub radius: f64,
    pub segment_count: usize,
    pub tilt: f64,
    points: Vec<Vec3>,
}

impl Ring {
    pub fn new(ring_index: usize, radius: f64) -> Result<Self, SceneError> {
        let tilt = ring_tilt(ring_index);
        let points = ring_path(radius, RING_SEGMENTS, tilt)?;
        Ok(Self {
            ring_index,
            radius,
            segment_count: RING_SEGMENTS,
            tilt,
            points,
        })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }
}

/// The three rings of an atom scene
pub fn atom_rings(radius: f64) -> Result<Vec<Ring>, SceneError> {
    (0..RING_COUNT).map(|r| Ring::new(r, radius)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_ring_has_zero_y() {
        let path = ring_path(4.0, 64, 0.0).unwrap();
        assert!(path.iter().all(|p| p[1].abs() < 1e-12));
    }

    #[test]
    fn test_point_count() {
        assert_eq!(ring_path(4.0, 64, 0.3).unwrap().len(), 65);
        assert_eq!(ring_path(4.0, 1, 0.3).unwrap().len(), 2);
    }

    #[test]
    fn test_closed_loop() {
        for segments in [1, 2, 3, 7, 64, 1000] {
            let path = ring_path(2.5, segments, 1.1).unwrap();
            assert_eq!(path.first(), path.last());
        }
    }

    #[test]
    fn test_points_on_circle() {
        let path = ring_path(4.0, 64, ring_tilt(2)).unwrap();
        for p in &path {
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((r - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(
            ring_path(4.0, 64, ring_tilt(1)).unwrap(),
            ring_path(4.0, 64, ring_tilt(1)).unwrap()
        );
    }

    #[test]
    fn test_invalid_params() {
        assert_eq!(
            ring_path(4.0, 0, 0.0).unwrap_err(),
            SceneError::InvalidSegmentCount(0)
        );
        assert!(ring_path(-1.0, 64, 0.0).is_err());
    }

    #[test]
    fn test_atom_rings() {
        let rings = atom_rings(4.0).unwrap();
        assert_eq!(rings.len(), 3);
        for (r, ring) in rings.iter().enumerate() {
            assert_eq!(ring.ring_index, r);
            assert_eq!(ring.segment_count, 64);
            assert!((ring.tilt - r as f64 * PI / 3.0).abs() < 1e-12);
            assert_eq!(ring.points().len(), 65);
        }
    }
}
