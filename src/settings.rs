//! Player settings and simulation tuning
//!
//! Persisted as JSON next to the binary, or wherever `STOMPBOT_SETTINGS`
//! points.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::consts::{MOUSE_SENSITIVITY, ROBOT_FIRE_INTERVAL_MS};

/// Errors from reading or writing a settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Knobs the simulation reads at runtime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Milliseconds between robot volleys
    pub robot_fire_interval_ms: f32,
    /// Bullets older than this many ticks are culled
    pub bullet_max_age_ticks: u32,
    /// Allow the jump action
    pub jump_enabled: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            robot_fire_interval_ms: ROBOT_FIRE_INTERVAL_MS,
            bullet_max_age_ticks: 600,
            jump_enabled: false,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Radians of look rotation per pixel of mouse travel
    pub mouse_sensitivity: f32,
    /// Fixed RNG seed; random per run when absent
    pub seed: Option<u64>,

    // === Assets ===
    /// Quad-grid OBJ for the player's cannon
    pub cannon_mesh_path: Option<PathBuf>,
    /// Quads per mesh row
    pub mesh_columns: usize,

    // === Host ===
    /// Milliseconds per frame for the headless host
    pub frame_ms: f32,

    pub sim: SimConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: MOUSE_SENSITIVITY,
            seed: None,
            cannon_mesh_path: None,
            mesh_columns: 16,
            frame_ms: 16.0,
            sim: SimConfig::default(),
        }
    }
}

impl Settings {
    /// Environment variable overriding the settings path
    pub const PATH_ENV: &'static str = "STOMPBOT_SETTINGS";
    /// Default file name in the working directory
    pub const DEFAULT_FILE: &'static str = "stompbot.json";

    /// Where `load` looks for settings
    pub fn default_path() -> PathBuf {
        std::env::var_os(Self::PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_FILE))
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            log::info!("Using default settings");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring settings at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let file = std::fs::File::open(path)?;
        let settings: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        self.validate()?;
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Reject values the simulation or host can't run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                })
            }
        };
        positive("mouse_sensitivity", self.mouse_sensitivity)?;
        positive("frame_ms", self.frame_ms)?;
        positive("sim.robot_fire_interval_ms", self.sim.robot_fire_interval_ms)?;
        if self.mesh_columns == 0 {
            return Err(SettingsError::Invalid {
                field: "mesh_columns",
                reason: "must be at least 1".into(),
            });
        }
        // Zero would cull every bullet on the tick it was fired
        if self.sim.bullet_max_age_ticks == 0 {
            return Err(SettingsError::Invalid {
                field: "sim.bullet_max_age_ticks",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// The seed to run with
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
