//! Debug overlay — alignment markers toggled with the `D` key.
//!
//! Shows the hat anchor, the standing-cat anchor and the door drop zone so
//! the configuration can be lined up against the background art. Has no
//! say in the scene state.

use crate::engine::stage::{SpriteId, Stage};

/// Markers controlled by the overlay
pub const DEBUG_MARKERS: [SpriteId; 3] = [SpriteId::DebugHat, SpriteId::DebugCat, SpriteId::DebugDoor];

#[derive(Debug, Default)]
pub struct DebugOverlay {
    pub enabled: bool,
}

impl DebugOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a typed character. Returns true if it toggled the overlay.
    pub fn on_char(&mut self, ch: char, stage: &mut Stage) -> bool {
        if !ch.eq_ignore_ascii_case(&'d') {
            return false;
        }
        self.set_enabled(!self.enabled, stage);
        true
    }

    pub fn set_enabled(&mut self, enabled: bool, stage: &mut Stage) {
        self.enabled = enabled;
        for id in DEBUG_MARKERS {
            stage.set_visible(id, enabled);
        }
        tracing::info!("Debug overlay → {}", if enabled { "ON" } else { "OFF" });
    }
}
