//! Stage — the retained visual tree the scene logic reads and writes.
//!
//! Each element has a center anchor and a box size in stage percent, a
//! visibility flag, a visual (image source or a drawn shape) and a set of
//! effect flags. Nothing in here knows about windows or framebuffers; the
//! renderer walks `draw_order()` and the game logic only ever calls the
//! small read/write API below.

use napcat_common::{Anchor, ClientPoint, StageRect, Zone};

use crate::assets::{AssetKey, AssetStore};

/// Every element on the stage, in back-to-front draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Background1,
    Background2,
    Outside,
    Hat,
    CatBed,
    Think1,
    Think2,
    Think3,
    Fish,
    CatStand,
    CatHat,
    CatFishing,
    Ripple,
    DebugHat,
    DebugCat,
    DebugDoor,
}

impl SpriteId {
    pub const ALL: [SpriteId; 16] = [
        SpriteId::Background1,
        SpriteId::Background2,
        SpriteId::Outside,
        SpriteId::Hat,
        SpriteId::CatBed,
        SpriteId::Think1,
        SpriteId::Think2,
        SpriteId::Think3,
        SpriteId::Fish,
        SpriteId::CatStand,
        SpriteId::CatHat,
        SpriteId::CatFishing,
        SpriteId::Ripple,
        SpriteId::DebugHat,
        SpriteId::DebugCat,
        SpriteId::DebugDoor,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// What the element looks like before anything changes it
    fn initial_visual(self) -> Visual {
        match self {
            SpriteId::Background1 => Visual::Image(AssetKey::Background1),
            SpriteId::Background2 => Visual::Image(AssetKey::Background2),
            SpriteId::Outside     => Visual::Image(AssetKey::Outside),
            SpriteId::Hat         => Visual::Image(AssetKey::Hat),
            SpriteId::CatBed      => Visual::Image(AssetKey::CatEyesOpen),
            SpriteId::Think1      => Visual::Image(AssetKey::Think1),
            SpriteId::Think2      => Visual::Image(AssetKey::Think2),
            SpriteId::Think3      => Visual::Image(AssetKey::Think3),
            SpriteId::Fish        => Visual::Image(AssetKey::Fish),
            SpriteId::CatStand    => Visual::Image(AssetKey::CatStand),
            SpriteId::CatHat      => Visual::Image(AssetKey::CatHat),
            SpriteId::CatFishing  => Visual::Image(AssetKey::CatFishing),
            SpriteId::Ripple      => Visual::Ripple,
            SpriteId::DebugHat
            | SpriteId::DebugCat  => Visual::Dot,
            SpriteId::DebugDoor   => Visual::Outline,
        }
    }

    /// Scene-1 opening: first background, sleeping cat, hat on its hook
    fn initially_visible(self) -> bool {
        matches!(self, SpriteId::Background1 | SpriteId::CatBed | SpriteId::Hat)
    }
}

/// How an element is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visual {
    Image(AssetKey),
    /// Small anchor marker
    Dot,
    /// Rectangle outline covering the element box
    Outline,
    /// Animated translucent water rings covering the element box
    Ripple,
}

/// Element extent in stage percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoxSize {
    /// Width given; height follows the element's intrinsic aspect ratio
    Auto { w_pct: f32 },
    Explicit { w_pct: f32, h_pct: f32 },
}

/// Visual treatments and input capabilities attached to an element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Effects {
    /// Responds to clicks (and shows the pointing-hand cursor)
    pub clickable: bool,
    /// Gentle attention pulse (hat)
    pub pulse: bool,
    /// Stronger pulse used for the fish
    pub fish_pulse: bool,
    /// Fading out since this virtual time (ms)
    pub fade_out_since: Option<u64>,
    /// Responds to drag gestures
    pub draggable: bool,
    /// A drag session is holding this element
    pub grabbing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: SpriteId,
    pub anchor: Anchor,
    pub size: BoxSize,
    /// Intrinsic height / width, used by `BoxSize::Auto`
    pub aspect: f32,
    pub visible: bool,
    pub visual: Visual,
    pub effects: Effects,
}

/// An element's box in client pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ClientBox {
    pub fn center(&self) -> ClientPoint {
        ClientPoint::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Half-open box test (left/top inclusive)
    pub fn contains(&self, p: ClientPoint) -> bool {
        p.x >= self.left
            && p.y >= self.top
            && p.x < self.left + self.width
            && p.y < self.top + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    rect: StageRect,
    elements: Vec<Element>,
}

impl Stage {
    /// Build every element at the stage center, sized full-stage, with the
    /// opening visibility. Layout moves them into place afterwards.
    pub fn new(rect: StageRect, assets: &AssetStore) -> Self {
        let elements = SpriteId::ALL
            .iter()
            .map(|&id| {
                let visual = id.initial_visual();
                let aspect = match visual {
                    Visual::Image(key) => assets.aspect(key),
                    _ => 1.0,
                };
                Element {
                    id,
                    anchor: Anchor::new(50.0, 50.0),
                    size: BoxSize::Explicit { w_pct: 100.0, h_pct: 100.0 },
                    aspect,
                    visible: id.initially_visible(),
                    visual,
                    effects: Effects::default(),
                }
            })
            .collect();
        Self { rect, elements }
    }

    pub fn rect(&self) -> StageRect {
        self.rect
    }

    /// The stage was re-rendered at a new size; percent positions are kept.
    #[cfg(test)]
    pub fn set_rect(&mut self, rect: StageRect) {
        self.rect = rect;
    }

    pub fn element(&self, id: SpriteId) -> &Element {
        &self.elements[id.index()]
    }

    pub fn element_mut(&mut self, id: SpriteId) -> &mut Element {
        &mut self.elements[id.index()]
    }

    /// Back-to-front
    pub fn draw_order(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    // -----------------------------------------------------------------------
    // Visibility
    // -----------------------------------------------------------------------

    pub fn show(&mut self, id: SpriteId) {
        self.element_mut(id).visible = true;
    }

    pub fn hide(&mut self, id: SpriteId) {
        self.element_mut(id).visible = false;
    }

    pub fn set_visible(&mut self, id: SpriteId, visible: bool) {
        self.element_mut(id).visible = visible;
    }

    pub fn is_visible(&self, id: SpriteId) -> bool {
        self.element(id).visible
    }

    // -----------------------------------------------------------------------
    // Position / size / source
    // -----------------------------------------------------------------------

    #[cfg(test)]
    pub fn position(&self, id: SpriteId) -> Anchor {
        self.element(id).anchor
    }

    pub fn set_position(&mut self, id: SpriteId, anchor: Anchor) {
        self.element_mut(id).anchor = anchor;
    }

    pub fn set_size(&mut self, id: SpriteId, size: BoxSize) {
        self.element_mut(id).size = size;
    }

    /// Cover a zone exactly (center + extent)
    pub fn fit_zone(&mut self, id: SpriteId, zone: Zone) {
        let el = self.element_mut(id);
        el.anchor = zone.center();
        el.size = BoxSize::Explicit { w_pct: zone.w_pct, h_pct: zone.h_pct };
    }

    /// Current image source, if the element shows an image
    #[cfg(test)]
    pub fn source(&self, id: SpriteId) -> Option<AssetKey> {
        match self.element(id).visual {
            Visual::Image(key) => Some(key),
            _ => None,
        }
    }

    pub fn set_source(&mut self, id: SpriteId, key: AssetKey) {
        self.element_mut(id).visual = Visual::Image(key);
    }

    pub fn effects(&self, id: SpriteId) -> &Effects {
        &self.element(id).effects
    }

    pub fn effects_mut(&mut self, id: SpriteId) -> &mut Effects {
        &mut self.element_mut(id).effects
    }

    // -----------------------------------------------------------------------
    // Client-space queries
    // -----------------------------------------------------------------------

    /// The element's box in client pixels (its anchor is the box center)
    pub fn client_box(&self, id: SpriteId) -> ClientBox {
        let el = self.element(id);
        let center = self.rect.to_client(el.anchor);
        let (width, height) = match el.size {
            BoxSize::Auto { w_pct } => {
                let w = self.rect.width_px(w_pct);
                (w, w * el.aspect)
            }
            BoxSize::Explicit { w_pct, h_pct } => {
                (self.rect.width_px(w_pct), self.rect.height_px(h_pct))
            }
        };
        ClientBox {
            left: center.x - width / 2.0,
            top: center.y - height / 2.0,
            width,
            height,
        }
    }

    /// Visible and under the point
    pub fn hit_test(&self, id: SpriteId, p: ClientPoint) -> bool {
        self.is_visible(id) && self.client_box(id).contains(p)
    }

    /// Topmost visible element under the point that passes `filter`
    pub fn topmost_at(&self, p: ClientPoint, filter: impl Fn(&Element) -> bool) -> Option<SpriteId> {
        self.elements
            .iter()
            .rev()
            .find(|el| el.visible && filter(el) && self.client_box(el.id).contains(p))
            .map(|el| el.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> Stage {
        Stage::new(StageRect::sized(1000.0, 500.0).unwrap(), &AssetStore::placeholders())
    }

    #[test]
    fn opening_visibility() {
        let s = stage();
        for id in SpriteId::ALL {
            let expect = matches!(id, SpriteId::Background1 | SpriteId::CatBed | SpriteId::Hat);
            assert_eq!(s.is_visible(id), expect, "{:?}", id);
        }
        assert_eq!(s.source(SpriteId::CatBed), Some(AssetKey::CatEyesOpen));
        assert_eq!(s.source(SpriteId::Ripple), None);
    }

    #[test]
    fn auto_box_uses_aspect() {
        let mut s = stage();
        s.set_position(SpriteId::Fish, Anchor::new(30.0, 40.0));
        s.set_size(SpriteId::Fish, BoxSize::Auto { w_pct: 10.0 });
        let b = s.client_box(SpriteId::Fish);
        // Fish placeholder is 16x8 → aspect 0.5; width 10% of 1000
        assert!((b.width - 100.0).abs() < 1e-3);
        assert!((b.height - 50.0).abs() < 1e-3);
        assert!((b.left - 250.0).abs() < 1e-3);
        assert!((b.top - 175.0).abs() < 1e-3);
        let c = b.center();
        assert!((c.x - 300.0).abs() < 1e-3 && (c.y - 200.0).abs() < 1e-3);
    }

    #[test]
    fn fit_zone_covers_extent() {
        let mut s = stage();
        s.fit_zone(SpriteId::DebugDoor, Zone::new(88.0, 55.0, 18.0, 35.0));
        let b = s.client_box(SpriteId::DebugDoor);
        assert!((b.left - 790.0).abs() < 1e-3);
        assert!((b.top - 187.5).abs() < 1e-3);
        assert!((b.width - 180.0).abs() < 1e-3);
        assert!((b.height - 175.0).abs() < 1e-3);
    }

    #[test]
    fn hidden_elements_are_not_hit() {
        let mut s = stage();
        let center = s.client_box(SpriteId::Fish).center();
        assert!(!s.hit_test(SpriteId::Fish, center));
        s.show(SpriteId::Fish);
        assert!(s.hit_test(SpriteId::Fish, center));
    }

    #[test]
    fn topmost_prefers_later_elements() {
        let mut s = stage();
        s.show(SpriteId::Fish);
        let p = ClientPoint::new(500.0, 250.0);
        // Both full-stage at init; fish draws above the hat
        assert_eq!(s.topmost_at(p, |_| true), Some(SpriteId::Fish));
        assert_eq!(
            s.topmost_at(p, |el| el.id != SpriteId::Fish),
            Some(SpriteId::CatBed)
        );
    }
}
