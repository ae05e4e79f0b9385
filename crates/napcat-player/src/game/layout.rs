//! Layout — places every sprite from the scene configuration.
//!
//! Runs once at startup. Positions are anchors (sprite centers) and widths
//! in stage percent; heights follow each image's aspect ratio.

use napcat_common::{Anchor, SceneConfig};

use crate::engine::stage::{BoxSize, SpriteId, Stage};

/// Interpolation fractions (x, y) for the first two thought bubbles,
/// measured from the bed cat towards the thought anchor
pub const THOUGHT_TRAIL: [(f32, f32); 2] = [(0.25, 0.35), (0.55, 0.65)];

/// Set an element's center and width; height scales from its aspect ratio.
pub fn place(stage: &mut Stage, id: SpriteId, anchor: Anchor, w_pct: f32) {
    stage.set_position(id, anchor);
    stage.set_size(id, BoxSize::Auto { w_pct });
}

/// Bubble trail from `cat` to `thought`: two interpolated waypoints, then
/// the thought anchor itself.
pub fn thought_waypoints(cat: Anchor, thought: Anchor) -> [Anchor; 3] {
    let [(fx1, fy1), (fx2, fy2)] = THOUGHT_TRAIL;
    [
        cat.lerp(thought, fx1, fy1),
        cat.lerp(thought, fx2, fy2),
        thought,
    ]
}

/// Initial placement of the whole scene
pub fn layout_scene(stage: &mut Stage, config: &SceneConfig) {
    let a = &config.anchors;
    let s = &config.sizes;

    // Scene 1
    place(stage, SpriteId::Hat, a.hat, s.hat);
    place(stage, SpriteId::CatBed, a.cat_bed, s.cat_bed);
    place(stage, SpriteId::CatStand, a.cat_stand, s.cat_stand);
    place(stage, SpriteId::CatHat, a.cat_stand, s.cat_hat);

    // Thought trail: small → medium → large
    let [w1, w2, w3] = thought_waypoints(a.cat_bed, a.thought);
    place(stage, SpriteId::Think1, w1, s.think1);
    place(stage, SpriteId::Think2, w2, s.think2);
    place(stage, SpriteId::Think3, w3, s.think3);
    place(stage, SpriteId::Fish, a.thought, s.fish);

    // Scene 2
    place(stage, SpriteId::CatFishing, a.scene2_cat_fishing, s.cat_fishing);
    stage.fit_zone(SpriteId::Ripple, config.zones.lake_ripple);

    // Debug markers
    stage.set_position(SpriteId::DebugHat, a.hat);
    stage.set_position(SpriteId::DebugCat, a.cat_stand);
    for id in [SpriteId::DebugHat, SpriteId::DebugCat] {
        stage.set_size(id, BoxSize::Explicit { w_pct: 1.0, h_pct: 1.0 });
    }
    stage.fit_zone(SpriteId::DebugDoor, config.zones.door);

    tracing::debug!(
        "Layout: thought trail ({:.1},{:.1}) ({:.1},{:.1}) ({:.1},{:.1})",
        w1.x_pct, w1.y_pct, w2.x_pct, w2.y_pct, w3.x_pct, w3.y_pct
    );
}
