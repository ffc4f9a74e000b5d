//! Lighting configuration
//!
//! Loaded once at startup from an optional TOML file. Every key is optional;
//! missing keys fall back to the classic torch/lantern values:
//!
//! ```toml
//! darkness_alpha = 0.75
//! blend_mode = "add"
//!
//! [player]
//! radius = 250.0
//! color = "#fff6cc"
//! alpha = 0.15
//! switch_id = 22
//! height_offset = 24.0
//!
//! [torch]
//! alpha = 0.4
//! height_offset = 24.0
//!
//! [flicker]
//! speed = 0.03
//! range = 0.12
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::Error;
use crate::flicker::FlickerParams;
use crate::present::BlendMode;

/// Everything the compositor and flicker need. Not reloadable mid-session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Alpha of the flat darkness fill.
    pub darkness_alpha: f32,
    /// How the finished overlay is laid over the scene.
    pub blend_mode: BlendMode,
    pub player: PlayerLightConfig,
    pub torch: TorchConfig,
    pub flicker: FlickerParams,
}

/// The lantern carried by the player. Constant intensity and hue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerLightConfig {
    pub radius: f32,
    pub color: Rgb,
    pub alpha: f32,
    /// Switch id that turns the lantern on.
    pub switch_id: u32,
    /// Pixels above the feet where the light is centered.
    pub height_offset: f32,
}

/// Shared drawing parameters for every map torch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorchConfig {
    pub alpha: f32,
    pub height_offset: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            darkness_alpha: 0.75,
            blend_mode: BlendMode::default(),
            player: PlayerLightConfig::default(),
            torch: TorchConfig::default(),
            flicker: FlickerParams::default(),
        }
    }
}

impl Default for PlayerLightConfig {
    fn default() -> Self {
        Self {
            radius: 250.0,
            color: Rgb::new(0xff, 0xf6, 0xcc),
            alpha: 0.15,
            switch_id: 22,
            height_offset: 24.0,
        }
    }
}

impl Default for TorchConfig {
    fn default() -> Self {
        Self { alpha: 0.4, height_offset: 24.0 }
    }
}

impl LightingConfig {
    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        tracing::info!(
            path = %path.display(),
            darkness_alpha = config.darkness_alpha,
            lantern_switch = config.player.switch_id,
            "Loaded lighting config"
        );
        Ok(config)
    }

    /// Reject values that would break the bounded-output guarantees.
    pub fn validate(&self) -> Result<(), Error> {
        let unit = |name: &str, v: f32| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(Error::ConfigInvalid(format!("{name} must be in [0,1], got {v}")))
            }
        };

        unit("darkness_alpha", self.darkness_alpha)?;
        unit("player.alpha", self.player.alpha)?;
        unit("torch.alpha", self.torch.alpha)?;
        unit("flicker.retarget_chance", self.flicker.retarget_chance)?;
        unit("flicker.range", self.flicker.range)?;

        if !(self.player.radius > 0.0 && self.player.radius.is_finite()) {
            return Err(Error::ConfigInvalid(format!(
                "player.radius must be > 0, got {}",
                self.player.radius
            )));
        }
        if !(self.flicker.speed > 0.0 && self.flicker.speed <= 1.0) {
            return Err(Error::ConfigInvalid(format!(
                "flicker.speed must be in (0,1], got {}",
                self.flicker.speed
            )));
        }
        if !(self.flicker.hue_step >= 0.0 && self.flicker.hue_step.is_finite()) {
            return Err(Error::ConfigInvalid(format!(
                "flicker.hue_step must be >= 0, got {}",
                self.flicker.hue_step
            )));
        }
        if !self.flicker.hue_shift_scale.is_finite() {
            return Err(Error::ConfigInvalid("flicker.hue_shift_scale must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_values() {
        let c = LightingConfig::default();
        assert_eq!(c.darkness_alpha, 0.75);
        assert_eq!(c.player.radius, 250.0);
        assert_eq!(c.player.color.to_hex(), "#fff6cc");
        assert_eq!(c.player.alpha, 0.15);
        assert_eq!(c.player.switch_id, 22);
        assert_eq!(c.torch.alpha, 0.4);
        assert_eq!(c.flicker.speed, 0.03);
        assert_eq!(c.flicker.range, 0.12);
        assert_eq!(c.blend_mode, BlendMode::Add);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let c: LightingConfig = toml::from_str("").unwrap();
        assert_eq!(c, LightingConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let c: LightingConfig = toml::from_str(
            r##"
darkness_alpha = 0.5
blend_mode = "normal"

[player]
color = "#ff0000"
switch_id = 3

[flicker]
range = 0.2
"##,
        )
        .unwrap();
        assert_eq!(c.darkness_alpha, 0.5);
        assert_eq!(c.blend_mode, BlendMode::Normal);
        assert_eq!(c.player.color, Rgb::new(255, 0, 0));
        assert_eq!(c.player.switch_id, 3);
        assert_eq!(c.player.radius, 250.0);
        assert_eq!(c.flicker.range, 0.2);
        assert_eq!(c.flicker.speed, 0.03);
    }

    #[test]
    fn test_bad_color_fails_to_parse() {
        let r: Result<LightingConfig, _> = toml::from_str("[player]\ncolor = \"#ff00\"\n");
        assert!(r.is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut c = LightingConfig::default();
        c.darkness_alpha = 1.5;
        assert!(matches!(c.validate(), Err(Error::ConfigInvalid(_))));

        let mut c = LightingConfig::default();
        c.player.radius = 0.0;
        assert!(c.validate().is_err());

        let mut c = LightingConfig::default();
        c.flicker.speed = 0.0;
        assert!(c.validate().is_err());

        let mut c = LightingConfig::default();
        c.flicker.retarget_chance = -0.1;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = LightingConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("torchlight-config-{}.toml", std::process::id()));
        fs::write(&path, "darkness_alpha = 0.6\n[torch]\nalpha = 0.3\n").unwrap();
        let c = LightingConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(c.darkness_alpha, 0.6);
        assert_eq!(c.torch.alpha, 0.3);
        assert_eq!(c.torch.height_offset, 24.0);
    }
}
