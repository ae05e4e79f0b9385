//! Game logic — the cat scene
//!
//! Scene flow:
//!   Scene 1 (bedroom) — sleeping cat blinks, dreams of a fish, gets up,
//!                       puts on its hat, and is dragged to the door
//!   Scene 2 (outside) — the cat sits by the lake, fishing
//!
//! `GameState` owns the stage, the timer scheduler and the sequencer, and
//! turns raw mouse/keyboard state from the engine into pointer, click and
//! key events.

pub mod blink;
pub mod cursor;
pub mod debug_overlay;
pub mod drag_drop;
pub mod layout;
pub mod sequencer;

use napcat_common::{ClientPoint, SceneConfig, StageRect};

use crate::assets::AssetStore;
use crate::engine::stage::Stage;
use crate::engine::timer::Scheduler;
use crate::game::cursor::CursorType;
use crate::game::debug_overlay::DebugOverlay;
use crate::game::sequencer::{SceneSequencer, SceneState, SceneTask, Transition};

/// Central game state
pub struct GameState {
    pub assets: AssetStore,
    pub stage: Stage,
    pub timers: Scheduler<SceneTask>,
    pub sequencer: SceneSequencer,
    pub debug: DebugOverlay,
    /// Last pointer position, in client pixels
    pub pointer: ClientPoint,
    /// Track whether the mouse was down last frame (for press/release edges)
    pub mouse_down: bool,
}

impl GameState {
    pub fn new(assets: AssetStore, config: SceneConfig, rect: StageRect) -> Self {
        let mut stage = Stage::new(rect, &assets);
        layout::layout_scene(&mut stage, &config);

        let mut timers = Scheduler::new();
        let mut sequencer = SceneSequencer::new(&config);
        sequencer.start(&mut stage, &mut timers);

        tracing::info!(
            "GameState initialized: {} assets ({} placeholders), stage {}x{}",
            assets.total(),
            assets.missing(),
            rect.width(),
            rect.height()
        );

        Self {
            assets,
            stage,
            timers,
            sequencer,
            debug: DebugOverlay::new(),
            pointer: ClientPoint::new(0.0, 0.0),
            mouse_down: false,
        }
    }

    pub fn state(&self) -> SceneState {
        self.sequencer.state()
    }

    /// Virtual time in ms
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    /// Advance the clock by `dt_ms`, firing every timer that falls due.
    pub fn update(&mut self, dt_ms: u64) {
        let deadline = self.timers.deadline(dt_ms);
        while let Some(task) = self.timers.pop_due(deadline) {
            self.sequencer.on_task(task, &mut self.stage, &mut self.timers);
        }
        self.timers.settle(deadline);
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Feed the current mouse state once per frame; press/release edges
    /// become pointer-down/up, everything else pointer-move.
    pub fn on_mouse_state(&mut self, x: f32, y: f32, mouse_down: bool) {
        let p = ClientPoint::new(x, y);
        let was_down = self.mouse_down;
        self.mouse_down = mouse_down;

        if p != self.pointer {
            self.pointer = p;
            self.on_pointer_move(p);
        }
        if mouse_down && !was_down {
            self.on_pointer_down(p);
        } else if !mouse_down && was_down {
            self.on_pointer_up(p);
        }
    }

    /// A press either starts a drag or counts as a click on the topmost
    /// clickable element. A drag grab is never also a click.
    pub fn on_pointer_down(&mut self, p: ClientPoint) -> Transition {
        if self.sequencer.on_pointer_down(&mut self.stage, p) {
            return Transition::Applied(self.sequencer.state());
        }
        match self.stage.topmost_at(p, |el| el.effects.clickable) {
            Some(id) => self.sequencer.on_click(id, &mut self.stage, &mut self.timers),
            None => Transition::Ignored,
        }
    }

    pub fn on_pointer_move(&mut self, p: ClientPoint) -> Transition {
        self.sequencer.on_pointer_move(&mut self.stage, p)
    }

    pub fn on_pointer_up(&mut self, p: ClientPoint) -> Transition {
        self.sequencer.on_pointer_up(&mut self.stage, &mut self.timers, p)
    }

    pub fn on_char_input(&mut self, ch: char) {
        self.debug.on_char(ch, &mut self.stage);
    }

    pub fn cursor(&self) -> CursorType {
        cursor::cursor_at(&self.stage, self.pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::stage::SpriteId;
    use crate::game::sequencer::HAT_FADE_MS;

    fn game() -> GameState {
        GameState::new(
            AssetStore::placeholders(),
            SceneConfig::default(),
            StageRect::sized(960.0, 540.0).unwrap(),
        )
    }

    fn center(g: &GameState, id: SpriteId) -> ClientPoint {
        g.stage.client_box(id).center()
    }

    /// Press and release at one spot, as the engine would over two frames
    fn click_at(g: &mut GameState, p: ClientPoint) {
        g.on_mouse_state(p.x, p.y, true);
        g.on_mouse_state(p.x, p.y, false);
    }

    #[test]
    fn full_story_through_mouse_input() {
        let mut g = game();
        assert_eq!(g.state(), SceneState::Blink);

        let cat = center(&g, SpriteId::CatBed);
        click_at(&mut g, cat);
        assert_eq!(g.state(), SceneState::Thinking);

        // 60 fps frames
        for _ in 0..63 {
            g.update(16);
        }
        assert_eq!(g.state(), SceneState::Fish);

        let fish = center(&g, SpriteId::Fish);
        click_at(&mut g, fish);
        assert_eq!(g.state(), SceneState::Stand);

        let hat = center(&g, SpriteId::Hat);
        click_at(&mut g, hat);
        assert_eq!(g.state(), SceneState::HatFade);
        g.update(HAT_FADE_MS);
        assert_eq!(g.state(), SceneState::Drag);

        // Drag the hatted cat into the door over a few frames
        let from = center(&g, SpriteId::CatHat);
        let to = g.stage.rect().to_client(SceneConfig::default().zones.door.center());
        g.on_mouse_state(from.x, from.y, true);
        assert_eq!(g.cursor(), CursorType::Grabbing);
        for i in 1..=10 {
            let t = i as f32 / 10.0;
            g.on_mouse_state(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t, true);
            g.update(16);
        }
        g.on_mouse_state(to.x, to.y, false);
        assert_eq!(g.state(), SceneState::Scene2);

        g.update(600);
        assert!(g.stage.is_visible(SpriteId::Outside));
        assert!(g.stage.is_visible(SpriteId::CatFishing));
        assert!(g.stage.is_visible(SpriteId::Ripple));
        assert!(!g.stage.is_visible(SpriteId::CatHat));
        assert!(!g.stage.is_visible(SpriteId::Background1));
    }

    #[test]
    fn clicks_only_reach_clickable_elements() {
        let mut g = game();
        // The hat is visible but not clickable while the cat sleeps
        let hat = center(&g, SpriteId::Hat);
        click_at(&mut g, hat);
        assert_eq!(g.state(), SceneState::Blink);
        // Empty floor
        click_at(&mut g, ClientPoint::new(2.0, 2.0));
        assert_eq!(g.state(), SceneState::Blink);
    }

    #[test]
    fn held_button_is_one_click() {
        let mut g = game();
        let p = center(&g, SpriteId::CatBed);
        for _ in 0..5 {
            g.on_mouse_state(p.x, p.y, true);
        }
        assert_eq!(g.state(), SceneState::Thinking);
        assert_eq!(g.timers.pending(), 1);
    }

    #[test]
    fn debug_key_does_not_touch_story() {
        let mut g = game();
        g.on_char_input('D');
        assert!(g.debug.enabled);
        assert!(g.stage.is_visible(SpriteId::DebugDoor));
        assert_eq!(g.state(), SceneState::Blink);
        g.on_char_input('x');
        assert!(g.debug.enabled);
    }

    #[test]
    fn cursor_follows_affordance() {
        let mut g = game();
        let cat = center(&g, SpriteId::CatBed);
        g.on_mouse_state(cat.x, cat.y, false);
        assert_eq!(g.cursor(), CursorType::Click);
        g.on_mouse_state(1.0, 1.0, false);
        assert_eq!(g.cursor(), CursorType::Standard);
    }

    #[test]
    fn update_settles_clock() {
        let mut g = game();
        g.update(16);
        g.update(16);
        assert_eq!(g.now(), 32);
    }
}
