//! Orbit Scene - animated skill orbits around a central anchor
//!
//! Deterministic kinematics for two decorative 3D scenes:
//! - atom: items float around a tumbling nucleus inside three tilted rings
//! - orbit: items revolve around a turning monitor

pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod gui;
pub mod kinematics;
pub mod logging;
pub mod scene;
pub mod sink;
pub mod typing;

pub use error::{SceneError, SinkError};
pub use scene::{Frame, Scene, SceneHandle};
