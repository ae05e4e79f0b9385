//! Cursor affordance
//!
//! The cursor mirrors whatever the element under the pointer offers:
//! clickable elements get the click cursor, draggable ones an open hand,
//! and an element held by a drag session a closed hand. A held element wins
//! even when the pointer has slipped off it.

use minifb::CursorStyle;
use napcat_common::ClientPoint;

use crate::engine::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorType {
    Standard,
    Click,
    Grab,
    Grabbing,
}

impl CursorType {
    /// Closest system cursor. minifb has no pointing hand, so clickable
    /// elements get the crosshair; the hands stay reserved for dragging.
    pub fn style(self) -> CursorStyle {
        match self {
            CursorType::Standard => CursorStyle::Arrow,
            CursorType::Click    => CursorStyle::Crosshair,
            CursorType::Grab     => CursorStyle::OpenHand,
            CursorType::Grabbing => CursorStyle::ClosedHand,
        }
    }
}

/// Cursor for a pointer position
pub fn cursor_at(stage: &Stage, p: ClientPoint) -> CursorType {
    if stage.draw_order().any(|el| el.visible && el.effects.grabbing) {
        return CursorType::Grabbing;
    }
    let hovered = stage.topmost_at(p, |el| el.effects.clickable || el.effects.draggable);
    match hovered.map(|id| stage.effects(id)) {
        Some(fx) if fx.draggable => CursorType::Grab,
        Some(fx) if fx.clickable => CursorType::Click,
        _ => CursorType::Standard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetStore;
    use crate::engine::stage::{BoxSize, SpriteId};
    use napcat_common::{Anchor, StageRect};

    fn stage() -> Stage {
        let mut s = Stage::new(StageRect::sized(1000.0, 500.0).unwrap(), &AssetStore::placeholders());
        s.set_position(SpriteId::Hat, Anchor::new(50.0, 50.0));
        s.set_size(SpriteId::Hat, BoxSize::Auto { w_pct: 10.0 });
        s
    }

    #[test]
    fn plain_elements_show_standard() {
        let s = stage();
        assert_eq!(cursor_at(&s, ClientPoint::new(500.0, 250.0)), CursorType::Standard);
    }

    #[test]
    fn clickable_and_draggable() {
        let mut s = stage();
        s.effects_mut(SpriteId::Hat).clickable = true;
        assert_eq!(cursor_at(&s, ClientPoint::new(500.0, 250.0)), CursorType::Click);
        assert_eq!(cursor_at(&s, ClientPoint::new(5.0, 5.0)), CursorType::Standard);

        s.effects_mut(SpriteId::Hat).clickable = false;
        s.effects_mut(SpriteId::Hat).draggable = true;
        assert_eq!(cursor_at(&s, ClientPoint::new(500.0, 250.0)), CursorType::Grab);

        s.effects_mut(SpriteId::Hat).grabbing = true;
        assert_eq!(cursor_at(&s, ClientPoint::new(5.0, 5.0)), CursorType::Grabbing);
    }

    #[test]
    fn each_affordance_has_its_own_system_cursor() {
        assert!(matches!(CursorType::Standard.style(), CursorStyle::Arrow));
        assert!(matches!(CursorType::Click.style(), CursorStyle::Crosshair));
        assert!(matches!(CursorType::Grab.style(), CursorStyle::OpenHand));
        assert!(matches!(CursorType::Grabbing.style(), CursorStyle::ClosedHand));
    }
}
