//! Rotation driver - incremental group and anchor rotation
//!
//! Increments are per tick by default, so spin speed follows the frame rate.
//! `RotationMode::TimeScaled` rescales them by the frame's delta time instead.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::error::SceneError;
use crate::kinematics::Orientation;

/// Per-tick increments (radians)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationRates {
    pub group_yaw: f64,
    pub anchor_pitch: f64,
    pub anchor_yaw: f64,
}

impl RotationRates {
    /// Whole atom group turns slowly, nucleus tumbles faster
    pub const ATOM: RotationRates = RotationRates {
        group_yaw: 0.003,
        anchor_pitch: 0.01,
        anchor_yaw: 0.01,
    };

    /// Items orbit on their own; only the monitor turns
    pub const MONITOR: RotationRates = RotationRates {
        group_yaw: 0.0,
        anchor_pitch: 0.0,
        anchor_yaw: 0.005,
    };

    fn validate(&self) -> Result<(), SceneError> {
        for (name, value) in [
            ("group_yaw", self.group_yaw),
            ("anchor_pitch", self.anchor_pitch),
            ("anchor_yaw", self.anchor_yaw),
        ] {
            if !value.is_finite() {
                return Err(SceneError::InvalidRotationRate { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Fixed increment per tick
    #[default]
    PerTick,
    /// Increment scaled by `dt * reference_fps`
    TimeScaled,
}

/// Cumulative rotation counters, wrapped to [0, 2π)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SceneState {
    pub group_yaw: f64,
    pub anchor_pitch: f64,
    pub anchor_yaw: f64,
}

impl SceneState {
    pub fn group(&self) -> Orientation {
        Orientation::yaw(self.group_yaw)
    }

    pub fn anchor(&self) -> Orientation {
        Orientation {
            pitch: self.anchor_pitch,
            yaw: self.anchor_yaw,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RotationDriver {
    rates: RotationRates,
    mode: RotationMode,
    reference_fps: f64,
    has_anchor: bool,
}

impl RotationDriver {
    /// Fails on non-finite rates or a reference rate that is not a positive number
    pub fn new(
        rates: RotationRates,
        mode: RotationMode,
        reference_fps: f64,
        has_anchor: bool,
    ) -> Result<Self, SceneError> {
        rates.validate()?;
        if !reference_fps.is_finite() || reference_fps <= 0.0 {
            return Err(SceneError::InvalidReferenceFps(reference_fps));
        }
        Ok(Self {
            rates,
            mode,
            reference_fps,
            has_anchor,
        })
    }

    pub fn rates(&self) -> RotationRates {
        self.rates
    }

    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    /// Multiplier on per-tick increments for a frame lasting `dt` seconds
    pub fn scale(&self, dt: f64) -> f64 {
        match self.mode {
            RotationMode::PerTick => 1.0,
            RotationMode::TimeScaled => dt.max(0.0) * self.reference_fps,
        }
    }

    /// Apply one tick; `dt` is only read in time-scaled mode
    pub fn advance(&self, state: &mut SceneState, dt: f64) {
        let scale = self.scale(dt);

        state.group_yaw = wrap(state.group_yaw + self.rates.group_yaw * scale);
        if self.has_anchor {
            state.anchor_pitch = wrap(state.anchor_pitch + self.rates.anchor_pitch * scale);
            state.anchor_yaw = wrap(state.anchor_yaw + self.rates.anchor_yaw * scale);
        }
    }
}

fn wrap(angle: f64) -> f64 {
    if (0.0..TAU).contains(&angle) {
        angle
    } else {
        angle.rem_euclid(TAU)
    }
}
