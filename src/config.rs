//! Configuration loader - YAML scene manifest + .env settings

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::Rgb;
use crate::kinematics::RotationMode;
use crate::scene::{ItemSpec, RotationSettings, SceneKind, SceneSpec, DEFAULT_RADIUS};
use crate::typing::TypingTimings;

/// Main configuration loaded from scenes.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rotation: RotationSettings,
    #[serde(default)]
    pub typing: TypingConfig,
    pub scenes: Vec<SceneSpec>,
}

/// Banner texts shown above the viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingConfig {
    pub texts: Vec<String>,
    #[serde(flatten)]
    pub timings: TypingTimings,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            texts: ["Front-End Engineer", "AI Developer", "IT Support", "UI/UX Designer"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timings: TypingTimings::default(),
        }
    }
}

/// Seconds per headless tick when FRAME_STEP is unset
pub const DEFAULT_FRAME_STEP: f64 = 1.0 / 60.0;

/// Settings loaded from .env
#[derive(Debug, Clone)]
pub struct Settings {
    pub log_dir: String,
    pub rotation_mode: Option<RotationMode>,
    pub frame_step: f64,
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Get scene by ID
    pub fn get_scene(&self, id: &str) -> Option<&SceneSpec> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Scene by ID, or an error listing the known ones
    pub fn require_scene(&self, id: &str) -> Result<&SceneSpec> {
        self.get_scene(id).ok_or_else(|| {
            let known: Vec<&str> = self.scenes.iter().map(|s| s.id.as_str()).collect();
            anyhow::anyhow!("Scene not found: {} (available: {})", id, known.join(", "))
        })
    }

    /// Built-in content when no scenes.yaml exists
    pub fn builtin() -> Self {
        let atom = [
            ("HTML", "#E34F26"),
            ("CSS", "#1572B6"),
            ("PHP", "#777BB4"),
            ("JavaScript", "#F7DF1E"),
            ("Vite", "#646CFF"),
            ("Vue", "#42b883"),
            ("React", "#61DAFB"),
            ("Tailwind", "#06B6D4"),
        ];
        let orbit = [
            ("HTML", "#E34F26"),
            ("CSS", "#1572B6"),
            ("PHP", "#777BB4"),
            ("JavaScript", "#F7DF1E"),
            ("Vite", "#646CFF"),
            ("Vue", "#42b883"),
            ("React", "#61DAFB"),
            ("Tailwind", "#06B6D4"),
            ("Python", "#3776AB"),
            ("Flutter", "#02569B"),
            ("Golang", "#00ADD8"),
            ("Node.js", "#339933"),
        ];

        Config {
            rotation: RotationSettings::default(),
            typing: TypingConfig::default(),
            scenes: vec![
                builtin_scene("atom", "Programming Atom", SceneKind::Atom, &atom),
                builtin_scene("orbit", "Computer With Skills", SceneKind::Orbit, &orbit),
            ],
        }
    }

    /// Apply .env overrides
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        if let Some(mode) = settings.rotation_mode {
            self.rotation.mode = mode;
        }
        self
    }
}

fn builtin_scene(id: &str, name: &str, kind: SceneKind, items: &[(&str, &str)]) -> SceneSpec {
    SceneSpec {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        radius: DEFAULT_RADIUS,
        rates: None,
        items: items
            .iter()
            .map(|&(label, hex)| ItemSpec {
                label: label.to_string(),
                color: Rgb::from_hex(hex).unwrap_or_else(|e| {
                    tracing::warn!("Built-in item '{}' in '{}': {}, drawing it white", label, id, e);
                    Rgb::new(0xFF, 0xFF, 0xFF)
                }),
            })
            .collect(),
    }
}

impl Settings {
    /// Load settings from .env file
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        Settings {
            log_dir: std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            rotation_mode: rotation_mode_setting(std::env::var("ROTATION_MODE").ok()),
            frame_step: frame_step_setting(std::env::var("FRAME_STEP").ok()),
        }
    }
}

fn rotation_mode_setting(value: Option<String>) -> Option<RotationMode> {
    let value = value?;
    let mode = parse_rotation_mode(&value);
    if mode.is_none() {
        tracing::warn!(
            "Unknown ROTATION_MODE '{}', keeping the config value (expected per_tick or time_scaled)",
            value
        );
    }
    mode
}

fn frame_step_setting(value: Option<String>) -> f64 {
    let Some(value) = value else {
        return DEFAULT_FRAME_STEP;
    };
    match value.trim().parse::<f64>() {
        Ok(step) if step.is_finite() && step > 0.0 => step,
        _ => {
            tracing::warn!(
                "Invalid FRAME_STEP '{}', using {}",
                value,
                DEFAULT_FRAME_STEP
            );
            DEFAULT_FRAME_STEP
        }
    }
}

fn parse_rotation_mode(s: &str) -> Option<RotationMode> {
    match s.trim().to_ascii_lowercase().as_str() {
        "per_tick" | "tick" => Some(RotationMode::PerTick),
        "time_scaled" | "time" => Some(RotationMode::TimeScaled),
        _ => None,
    }
}
