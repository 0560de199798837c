//! Tunable parameters, loaded from an optional TOML file.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! [gesture]
//! touch_threshold = 25.0
//! key_press_delay_secs = 0.3
//!
//! [layout]
//! key_width = 60
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::controller::DEFAULT_KEY_PRESS_DELAY;
use crate::error::{Error, Result};
use crate::gesture::DEFAULT_TOUCH_THRESHOLD;
use crate::layout::KeyGeometry;

// ════════════════════════════════════════════════════════════════════════════
// Sections
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Capture device index.
    pub index:  u32,
    pub width:  u32,
    pub height: u32,
    /// Flip frames horizontally so the feed behaves like a mirror.
    pub mirror: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig { index: 0, width: 1280, height: 720, mirror: true }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Thumb-to-index distance (pixels) below which the fingers touch.
    pub touch_threshold:      f32,
    /// Minimum seconds between two typed keys.  0 disables the guard.
    pub key_press_delay_secs: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            touch_threshold:      DEFAULT_TOUCH_THRESHOLD,
            key_press_delay_secs: DEFAULT_KEY_PRESS_DELAY.as_secs_f64(),
        }
    }
}

impl GestureConfig {
    /// Out-of-range values (rejected by [`Config::validate`]) saturate.
    pub fn key_press_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.key_press_delay_secs).unwrap_or(Duration::MAX)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub min_detection_confidence: f32,
    pub min_tracking_confidence:  f32,
    /// Hand-landmark helper process: program followed by its arguments.
    /// Empty runs the helper bundled with the application under `python3`.
    pub command: Vec<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            min_detection_confidence: 0.5,
            min_tracking_confidence:  0.5,
            command: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectionConfig {
    /// Forward typed keys to the OS as real keystrokes.
    pub enabled: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Config
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera:    CameraConfig,
    pub gesture:   GestureConfig,
    pub layout:    KeyGeometry,
    pub detector:  DetectorConfig,
    pub injection: InjectionConfig,
}

impl Config {
    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Config = toml::from_str(&raw).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// `load(path)` when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Config::load(p),
            None    => Ok(Config::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(Error::InvalidConfig(msg));

        if !(self.gesture.touch_threshold > 0.0) {
            return bad(format!("gesture.touch_threshold must be > 0, got {}",
                               self.gesture.touch_threshold));
        }
        if Duration::try_from_secs_f64(self.gesture.key_press_delay_secs).is_err() {
            return bad(format!("gesture.key_press_delay_secs must be a finite value >= 0 \
                                that fits a Duration, got {}",
                               self.gesture.key_press_delay_secs));
        }
        if self.layout.key_width == 0 || self.layout.key_height == 0 {
            return bad("layout.key_width and layout.key_height must be non-zero".into());
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return bad("camera.width and camera.height must be non-zero".into());
        }
        match self.layout.qwerty_extent() {
            None => return bad("layout does not fit in u32 pixel coordinates".into()),
            Some((right, bottom)) if right > self.camera.width || bottom > self.camera.height => {
                return bad(format!(
                    "keyboard reaches ({}, {}), outside the {}x{} frame",
                    right, bottom, self.camera.width, self.camera.height,
                ));
            }
            Some(_) => {}
        }
        for (name, v) in [
            ("detector.min_detection_confidence", self.detector.min_detection_confidence),
            ("detector.min_tracking_confidence",  self.detector.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return bad(format!("{} must be within 0..=1, got {}", name, v));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.gesture.touch_threshold, 30.0);
        assert_eq!(cfg.gesture.key_press_delay(), Duration::from_millis(500));
        assert_eq!((cfg.camera.width, cfg.camera.height), (1280, 720));
        assert!(!cfg.injection.enabled);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let f = write_config(
            "[gesture]\ntouch_threshold = 25.0\n\n[layout]\nkey_width = 60\n",
        );
        let cfg = Config::load(f.path()).unwrap();
        assert_eq!(cfg.gesture.touch_threshold, 25.0);
        assert_eq!(cfg.gesture.key_press_delay_secs, 0.5);
        assert_eq!(cfg.layout.key_width, 60);
        assert_eq!(cfg.layout.key_height, 50);
        assert_eq!(cfg.camera, CameraConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let f = write_config("[gesture]\ntouch_threshold = 0.0\n");
        assert!(matches!(Config::load(f.path()), Err(Error::InvalidConfig(_))));

        let f = write_config("[detector]\nmin_detection_confidence = 1.5\n");
        assert!(matches!(Config::load(f.path()), Err(Error::InvalidConfig(_))));

        let f = write_config("[gesture]\nkey_press_delay_secs = -1.0\n");
        assert!(matches!(Config::load(f.path()), Err(Error::InvalidConfig(_))));

        let f = write_config("[gesture]\nkey_press_delay_secs = 1e30\n");
        assert!(matches!(Config::load(f.path()), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn oversized_layout_is_rejected() {
        let mut cfg = Config::default();
        cfg.layout.key_width = 500_000_000;
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));

        let mut cfg = Config::default();
        cfg.layout.origin_y = u32::MAX - 10;
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));

        // default grid ends at (830, 710); a 640x480 frame cannot hold it
        let mut cfg = Config::default();
        cfg.camera.width = 640;
        cfg.camera.height = 480;
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn huge_delay_never_panics() {
        let mut cfg = Config::default();
        cfg.gesture.key_press_delay_secs = 1e30;
        assert!(cfg.validate().is_err());
        assert_eq!(cfg.gesture.key_press_delay(), Duration::MAX);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let f = write_config("[gesture\ntouch_threshold = ");
        assert!(matches!(Config::load(f.path()), Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigIo { .. }));
    }

    #[test]
    fn rendered_toml_loads_back() {
        let mut cfg = Config::default();
        cfg.injection.enabled = true;
        cfg.camera.index = 2;
        let f = write_config(&cfg.to_toml().unwrap());
        assert_eq!(Config::load(f.path()).unwrap(), cfg);
    }
}
