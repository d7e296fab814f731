//! Kinematics - per-frame motion of everything in a scene
//!
//! - orbit: positions of labeled items (float and orbit variants)
//! - ring: static tilted ring polylines
//! - rotation: incremental group/anchor rotation

pub mod orbit;
pub mod ring;
pub mod rotation;

pub use orbit::*;
pub use ring::*;
pub use rotation::*;

use serde::Serialize;

/// Point in scene space
pub type Vec3 = [f64; 3];

/// Euler orientation in XYZ order: the matrix is `Rx(pitch)·Ry(yaw)`,
/// so a point is turned by yaw first and then by pitch
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Orientation {
    pub pitch: f64,
    pub yaw: f64,
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation { pitch: 0.0, yaw: 0.0 };

    pub fn yaw(yaw: f64) -> Self {
        Self { pitch: 0.0, yaw }
    }

    /// Rotate a point by this orientation
    pub fn apply(&self, p: Vec3) -> Vec3 {
        // Around Y (yaw)
        let (sy, cy) = self.yaw.sin_cos();
        let x1 = p[0] * cy + p[2] * sy;
        let z1 = -p[0] * sy + p[2] * cy;

        // Around X (pitch)
        let (sx, cx) = self.pitch.sin_cos();
        [x1, p[1] * cx - z1 * sx, p[1] * sx + z1 * cx]
    }
}
