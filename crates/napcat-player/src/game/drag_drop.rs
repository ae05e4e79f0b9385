//! Drag & Drop — pointer-captured dragging of one stage element onto a zone.
//!
//!   - Pointer down on the element → start a session, record the offset
//!     from the element's center to the pointer
//!   - Pointer move → element center follows pointer minus offset, stored
//!     in percent of the current stage size
//!   - Pointer up → final position, then the drop zone decides whether the
//!     drop completed
//!
//! Once a session is open the controller takes every move/up regardless of
//! where the pointer is (pointer capture). The offset is captured once at
//! grab; each position is recomputed from the live pointer, so repeated
//! moves cannot accumulate drift.

use napcat_common::{Anchor, ClientPoint, StageRect, Zone};

use crate::engine::stage::{SpriteId, Stage};

// ---------------------------------------------------------------------------
// Drag session
// ---------------------------------------------------------------------------

/// Transient state of one drag gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Pointer minus element center at grab time, in client pixels
    offset_x: f32,
    offset_y: f32,
}

impl DragSession {
    /// Where the element center goes for this pointer position, in stage percent
    fn center_for(&self, rect: &StageRect, p: ClientPoint) -> Anchor {
        rect.to_pct(ClientPoint::new(p.x - self.offset_x, p.y - self.offset_y))
    }
}

/// What happened when the pointer was released
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropResult {
    /// Released with the element center strictly inside the drop zone
    DroppedInZone { at: Anchor },
    /// Released anywhere else; the element stays where it was let go
    Dropped { at: Anchor },
    /// No drag was active
    Nothing,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Drag handling for a single element
#[derive(Debug)]
pub struct DragController {
    target: SpriteId,
    drop_zone: Zone,
    session: Option<DragSession>,
}

impl DragController {
    /// Make `target` draggable from now on.
    pub fn attach(stage: &mut Stage, target: SpriteId, drop_zone: Zone) -> Self {
        let fx = stage.effects_mut(target);
        fx.draggable = true;
        fx.grabbing = false;
        tracing::debug!("Drag attached to {:?}", target);
        Self {
            target,
            drop_zone,
            session: None,
        }
    }

    /// Remove the drag capability; an open session is dropped silently.
    pub fn detach(self, stage: &mut Stage) {
        let fx = stage.effects_mut(self.target);
        fx.draggable = false;
        fx.grabbing = false;
        tracing::debug!("Drag detached from {:?}", self.target);
    }

    /// Is a drag session open?
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    // -----------------------------------------------------------------------
    // Pointer handlers
    // -----------------------------------------------------------------------

    /// Returns true if a session started (the gesture is consumed).
    pub fn on_pointer_down(&mut self, stage: &mut Stage, p: ClientPoint) -> bool {
        if self.session.is_some() || !stage.hit_test(self.target, p) {
            return false;
        }

        let center = stage.client_box(self.target).center();
        self.session = Some(DragSession {
            offset_x: p.x - center.x,
            offset_y: p.y - center.y,
        });
        stage.effects_mut(self.target).grabbing = true;

        tracing::debug!(
            "Drag start: {:?} at ({:.0}, {:.0}), offset ({:.1}, {:.1})",
            self.target, p.x, p.y, p.x - center.x, p.y - center.y
        );
        true
    }

    /// Returns true if the element moved.
    pub fn on_pointer_move(&mut self, stage: &mut Stage, p: ClientPoint) -> bool {
        let Some(session) = self.session else {
            return false;
        };
        let at = session.center_for(&stage.rect(), p);
        stage.set_position(self.target, at);
        true
    }

    pub fn on_pointer_up(&mut self, stage: &mut Stage, p: ClientPoint) -> DropResult {
        let Some(session) = self.session.take() else {
            return DropResult::Nothing;
        };

        let at = session.center_for(&stage.rect(), p);
        stage.set_position(self.target, at);
        stage.effects_mut(self.target).grabbing = false;

        let inside = self.drop_zone.contains(at);
        tracing::debug!(
            "Drag end: {:?} at ({:.1}%, {:.1}%), in zone: {}",
            self.target, at.x_pct, at.y_pct, inside
        );

        if inside {
            DropResult::DroppedInZone { at }
        } else {
            DropResult::Dropped { at }
        }
    }
}
