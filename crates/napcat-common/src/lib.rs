//! Common types shared across napcat crates
//!
//! Everything here is renderer-independent: the scene configuration table
//! and the percentage-space geometry every sprite position resolves through.

pub mod config;
pub mod geometry;

pub use config::{Anchors, ConfigError, SceneConfig, SpriteSizes, Zones};
pub use geometry::{Anchor, ClientPoint, GeometryError, StageRect, Zone};
