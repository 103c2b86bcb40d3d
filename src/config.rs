//! Controller configuration: speed bounds, slider mapping, transition time.
//!
//! All fields have defaults, so a config file only needs the keys it changes:
//! ```json
//! { "default_interval_ms": 1000, "transition_ms": 300 }
//! ```
//!
//! Config path priority: CLI `--config` -> `YEARPLAY_CONFIG` env var -> none.

use crate::core::playback::SpeedBounds;
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "YEARPLAY_CONFIG";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Autoplay interval at startup and after reset
    pub default_interval_ms: u64,
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    /// Speed slider inversion: interval = slider_sum_ms - slider value
    pub slider_sum_ms: u64,
    pub slider_step_ms: u64,
    /// Mark transition duration
    pub transition_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            default_interval_ms: 1500,
            min_interval_ms: 500,
            max_interval_ms: 3000,
            slider_sum_ms: 3500,
            slider_step_ms: 100,
            transition_ms: 500,
        }
    }
}

impl ControllerConfig {
    /// Load from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config.normalized())
    }

    /// Save as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config {}", path.display()))
    }

    /// Resolve config path: CLI arg first, then env var
    pub fn resolve_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
        cli_path.or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
    }

    /// Load from the resolved path, or defaults when none is given
    pub fn from_env_and_cli(cli_path: Option<PathBuf>) -> Result<Self> {
        match Self::resolve_path(cli_path) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Fix inconsistent values instead of rejecting them:
    /// swapped bounds, default outside bounds, zero step.
    pub fn normalized(mut self) -> Self {
        if self.min_interval_ms > self.max_interval_ms {
            warn!(
                "Config: min_interval_ms {} > max_interval_ms {}, swapping",
                self.min_interval_ms, self.max_interval_ms
            );
            std::mem::swap(&mut self.min_interval_ms, &mut self.max_interval_ms);
        }
        let clamped = self.speed_bounds().clamp(self.default_interval_ms);
        if clamped != self.default_interval_ms {
            warn!(
                "Config: default_interval_ms {} outside bounds, using {}",
                self.default_interval_ms, clamped
            );
            self.default_interval_ms = clamped;
        }
        if self.slider_step_ms == 0 {
            self.slider_step_ms = 1;
        }
        self
    }

    pub fn speed_bounds(&self) -> SpeedBounds {
        SpeedBounds::new(self.min_interval_ms, self.max_interval_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Slider range, mirrored from the interval bounds
    pub fn slider_range(&self) -> (u64, u64) {
        let b = self.speed_bounds();
        (
            self.slider_sum_ms.saturating_sub(b.max_ms),
            self.slider_sum_ms.saturating_sub(b.min_ms),
        )
    }

    /// Speed slider value -> interval. Higher value means faster playback.
    /// The value is snapped to the slider step before inverting.
    pub fn interval_from_slider(&self, value: u64) -> u64 {
        let (lo, hi) = self.slider_range();
        let value = value.clamp(lo, hi);
        let step = self.slider_step_ms.max(1);
        let snapped = lo + ((value - lo) + step / 2) / step * step;
        self.speed_bounds()
            .clamp(self.slider_sum_ms.saturating_sub(snapped.min(hi)))
    }

    /// Interval -> speed slider value (for the slider thumb)
    pub fn slider_from_interval(&self, interval_ms: u64) -> u64 {
        self.slider_sum_ms.saturating_sub(interval_ms)
    }
}

/// Speed display text, e.g. `1.5s`
pub fn format_interval(interval_ms: u64) -> String {
    format!("{:.1}s", interval_ms as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_slider_layout() {
        let c = ControllerConfig::default();
        assert_eq!(c.slider_range(), (500, 3000));
        assert_eq!(c.interval_from_slider(1500), 2000);
        assert_eq!(c.interval_from_slider(3000), 500);
        assert_eq!(c.interval_from_slider(500), 3000);
        assert_eq!(c.slider_from_interval(1500), 2000);
    }

    #[test]
    fn test_higher_slider_is_faster() {
        let c = ControllerConfig::default();
        assert!(c.interval_from_slider(2500) < c.interval_from_slider(1000));
    }

    #[test]
    fn test_slider_clamped_and_snapped() {
        let c = ControllerConfig::default();
        assert_eq!(c.interval_from_slider(0), 3000);
        assert_eq!(c.interval_from_slider(99_999), 500);
        assert_eq!(c.interval_from_slider(1549), 2000);
        assert_eq!(c.interval_from_slider(1551), 1900);
    }

    #[test]
    fn test_normalize_fixes_bounds() {
        let c = ControllerConfig {
            min_interval_ms: 4000,
            max_interval_ms: 1000,
            default_interval_ms: 100,
            slider_step_ms: 0,
            ..Default::default()
        }
        .normalized();
        assert_eq!((c.min_interval_ms, c.max_interval_ms), (1000, 4000));
        assert_eq!(c.default_interval_ms, 1000);
        assert_eq!(c.slider_step_ms, 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: ControllerConfig = serde_json::from_str(r#"{"transition_ms": 250}"#).unwrap();
        assert_eq!(c.transition(), Duration::from_millis(250));
        assert_eq!(c.default_interval_ms, 1500);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(1500), "1.5s");
        assert_eq!(format_interval(500), "0.5s");
        assert_eq!(format_interval(3000), "3.0s");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = ControllerConfig::load(Path::new("/nonexistent/yearplay.json"));
        assert!(err.is_err());
    }
}
