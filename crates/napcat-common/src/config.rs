//! Scene configuration — anchors, zones, and sprite widths.
//!
//! The built-in table is the `Default` impl. A TOML file may override any
//! subset of it; every section and field is `#[serde(default)]`, so a file
//! containing only `[zones.door]` is valid. Configuration is validated once
//! at load and is read-only afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Anchor, Zone};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: String, reason: &'static str },
}

/// Named anchor points (sprite centers)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Anchors {
    pub hat: Anchor,
    pub cat_bed: Anchor,
    pub thought: Anchor,
    pub cat_stand: Anchor,
    pub scene2_cat_fishing: Anchor,
}

impl Default for Anchors {
    fn default() -> Self {
        Self {
            hat: Anchor::new(72.0, 28.0),
            cat_bed: Anchor::new(18.0, 62.0),
            thought: Anchor::new(30.0, 38.0),
            cat_stand: Anchor::new(54.0, 66.0),
            scene2_cat_fishing: Anchor::new(50.0, 70.0),
        }
    }
}

/// Named zones (center + extent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Zones {
    /// Drop target for the hatted cat
    pub door: Zone,
    /// Area covered by the ripple effect in scene 2
    pub lake_ripple: Zone,
}

impl Default for Zones {
    fn default() -> Self {
        Self {
            door: Zone::new(88.0, 55.0, 18.0, 35.0),
            lake_ripple: Zone::new(50.0, 72.0, 80.0, 35.0),
        }
    }
}

/// Sprite widths as % of stage width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteSizes {
    pub hat: f32,
    pub cat_bed: f32,
    pub think1: f32,
    pub think2: f32,
    pub think3: f32,
    pub fish: f32,
    pub cat_stand: f32,
    pub cat_hat: f32,
    pub cat_fishing: f32,
}

impl Default for SpriteSizes {
    fn default() -> Self {
        Self {
            hat: 6.0,
            cat_bed: 15.0,
            think1: 3.0,
            think2: 5.0,
            think3: 14.0,
            fish: 6.0,
            cat_stand: 10.0,
            cat_hat: 10.0,
            cat_fishing: 18.0,
        }
    }
}

/// The whole tunable surface of the scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub anchors: Anchors,
    pub zones: Zones,
    pub sizes: SpriteSizes,
}

impl SceneConfig {
    /// Load and validate a TOML override file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("Scene config loaded from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would corrupt placement at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.anchors;
        for (name, anchor) in [
            ("anchors.hat", a.hat),
            ("anchors.cat_bed", a.cat_bed),
            ("anchors.thought", a.thought),
            ("anchors.cat_stand", a.cat_stand),
            ("anchors.scene2_cat_fishing", a.scene2_cat_fishing),
        ] {
            if !anchor.x_pct.is_finite() || !anchor.y_pct.is_finite() {
                return Err(invalid(name, "non-finite percentage"));
            }
        }

        for (name, zone) in [
            ("zones.door", self.zones.door),
            ("zones.lake_ripple", self.zones.lake_ripple),
        ] {
            let all = [zone.x_pct, zone.y_pct, zone.w_pct, zone.h_pct];
            if all.iter().any(|v| !v.is_finite()) {
                return Err(invalid(name, "non-finite percentage"));
            }
            if zone.w_pct <= 0.0 || zone.h_pct <= 0.0 {
                return Err(invalid(name, "zone extent must be positive"));
            }
        }

        let s = &self.sizes;
        for (name, w) in [
            ("sizes.hat", s.hat),
            ("sizes.cat_bed", s.cat_bed),
            ("sizes.think1", s.think1),
            ("sizes.think2", s.think2),
            ("sizes.think3", s.think3),
            ("sizes.fish", s.fish),
            ("sizes.cat_stand", s.cat_stand),
            ("sizes.cat_hat", s.cat_hat),
            ("sizes.cat_fishing", s.cat_fishing),
        ] {
            if !w.is_finite() || w <= 0.0 {
                return Err(invalid(name, "sprite width must be positive"));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn default_door_zone() {
        let cfg = SceneConfig::default();
        assert_eq!(cfg.zones.door, Zone::new(88.0, 55.0, 18.0, 35.0));
        assert_eq!(cfg.anchors.cat_stand, Anchor::new(54.0, 66.0));
        assert_eq!(cfg.sizes.think3, 14.0);
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = SceneConfig::from_toml_str(
            r#"
            [zones.door]
            x_pct = 80.0
            y_pct = 50.0
            w_pct = 10.0
            h_pct = 20.0

            [sizes]
            fish = 8.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.zones.door, Zone::new(80.0, 50.0, 10.0, 20.0));
        assert_eq!(cfg.sizes.fish, 8.0);
        assert_eq!(cfg.sizes.hat, 6.0);
        assert_eq!(cfg.anchors, Anchors::default());
    }

    #[test]
    fn empty_file_is_default() {
        let cfg = SceneConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, SceneConfig::default());
    }

    #[test]
    fn zero_zone_rejected() {
        let err = SceneConfig::from_toml_str(
            r#"
            [zones.lake_ripple]
            x_pct = 50.0
            y_pct = 50.0
            w_pct = 0.0
            h_pct = 10.0
            "#,
        )
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { ref field, .. } if field == "zones.lake_ripple"),
            "{}",
            err
        );
    }

    #[test]
    fn negative_sprite_width_rejected() {
        let mut cfg = SceneConfig::default();
        cfg.sizes.cat_hat = -1.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = SceneConfig::from_toml_str("[anchors.hat]\nx_pct = \"left\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn sample_config_matches_defaults() {
        let cfg = SceneConfig::from_toml_str(include_str!("../../../config/scene.toml")).unwrap();
        assert_eq!(cfg, SceneConfig::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SceneConfig::load(Path::new("/definitely/not/here/scene.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
