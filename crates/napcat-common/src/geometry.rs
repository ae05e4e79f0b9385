//! Percentage geometry — anchors, zones, and the stage rectangle.
//!
//! All scene coordinates are percentages of the stage box. Only the
//! `StageRect` knows about client pixels; converting in either direction
//! goes through it, so positions stay resolution-independent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Anchor
// ---------------------------------------------------------------------------

/// A point in stage percent (0–100 on each axis, not clamped)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x_pct: f32,
    pub y_pct: f32,
}

impl Anchor {
    pub const fn new(x_pct: f32, y_pct: f32) -> Self {
        Self { x_pct, y_pct }
    }

    /// Linear interpolation towards `to`, with an independent fraction per axis.
    pub fn lerp(self, to: Anchor, fx: f32, fy: f32) -> Anchor {
        Anchor {
            x_pct: self.x_pct + (to.x_pct - self.x_pct) * fx,
            y_pct: self.y_pct + (to.y_pct - self.y_pct) * fy,
        }
    }
}

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// A rectangle given by its center and full extent, all in stage percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub x_pct: f32,
    pub y_pct: f32,
    pub w_pct: f32,
    pub h_pct: f32,
}

impl Zone {
    pub const fn new(x_pct: f32, y_pct: f32, w_pct: f32, h_pct: f32) -> Self {
        Self { x_pct, y_pct, w_pct, h_pct }
    }

    pub fn center(&self) -> Anchor {
        Anchor::new(self.x_pct, self.y_pct)
    }

    /// Left edge in percent
    pub fn left_pct(&self) -> f32 {
        self.x_pct - self.w_pct / 2.0
    }

    /// Top edge in percent
    pub fn top_pct(&self) -> f32 {
        self.y_pct - self.h_pct / 2.0
    }

    /// Strict containment: a point lying exactly on an edge is outside.
    pub fn contains(&self, p: Anchor) -> bool {
        let half_w = self.w_pct / 2.0;
        let half_h = self.h_pct / 2.0;
        p.x_pct > self.x_pct - half_w
            && p.x_pct < self.x_pct + half_w
            && p.y_pct > self.y_pct - half_h
            && p.y_pct < self.y_pct + half_h
    }
}

// ---------------------------------------------------------------------------
// Stage rectangle
// ---------------------------------------------------------------------------

/// A point in client (pointer) space, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientPoint {
    pub x: f32,
    pub y: f32,
}

impl ClientPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("stage has a degenerate size {width}x{height}")]
    DegenerateStage { width: f32, height: f32 },
}

/// The stage's rendered box in client pixels.
///
/// Width and height are always finite and positive, so percentage
/// conversion never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageRect {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl StageRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Result<Self, GeometryError> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if !ok(width) || !ok(height) || !left.is_finite() || !top.is_finite() {
            return Err(GeometryError::DegenerateStage { width, height });
        }
        Ok(Self { left, top, width, height })
    }

    /// Stage anchored at the client origin
    pub fn sized(width: f32, height: f32) -> Result<Self, GeometryError> {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Stage percent → client pixels
    pub fn to_client(&self, a: Anchor) -> ClientPoint {
        ClientPoint {
            x: self.left + a.x_pct / 100.0 * self.width,
            y: self.top + a.y_pct / 100.0 * self.height,
        }
    }

    /// Client pixels → stage percent
    pub fn to_pct(&self, p: ClientPoint) -> Anchor {
        Anchor {
            x_pct: (p.x - self.left) / self.width * 100.0,
            y_pct: (p.y - self.top) / self.height * 100.0,
        }
    }

    /// A width given in percent of the stage width, in pixels
    pub fn width_px(&self, w_pct: f32) -> f32 {
        w_pct / 100.0 * self.width
    }

    /// A height given in percent of the stage height, in pixels
    pub fn height_px(&self, h_pct: f32) -> f32 {
        h_pct / 100.0 * self.height
    }
}
