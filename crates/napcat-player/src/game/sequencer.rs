//! Scene sequencer — the state machine behind the whole story.
//!
//!   BLINK ──click cat──▶ THINKING ──reveal──▶ FISH ──click fish──▶ STAND
//!   STAND ──click hat──▶ HAT_FADE ──850 ms──▶ DRAG ──drop on door──▶ SCENE2
//!
//! Every handler checks the exact state it expects before touching anything;
//! a trigger that arrives in any other state is dropped. Click affordances
//! are attached when their state is entered and detached when it is left,
//! and delayed work re-checks the state it was scheduled for when it fires.

use std::fmt;

use napcat_common::{ClientPoint, SceneConfig, Zone};

use crate::engine::stage::{SpriteId, Stage};
use crate::engine::timer::Scheduler;
use crate::game::blink::BlinkLoop;
use crate::game::drag_drop::{DragController, DropResult};

// ---------------------------------------------------------------------------
// Timings (ms)
// ---------------------------------------------------------------------------

/// Hat fade-out before the cat puts it on
pub const HAT_FADE_MS: u64 = 850;
/// Door-opening flash before the outside scene
pub const SCENE_FLASH_MS: u64 = 600;

/// What one reveal step does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEffect {
    Show(SpriteId),
    /// Show the fish and make it clickable (THINKING → FISH)
    Fish,
}

/// One step of the thought-bubble reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealStep {
    /// Delay after the previous step fired
    pub delay_ms: u64,
    pub effect: RevealEffect,
}

/// Bubbles at +0, +350, +700, fish 300 ms after the last bubble
pub const REVEAL_STEPS: [RevealStep; 4] = [
    RevealStep { delay_ms: 0, effect: RevealEffect::Show(SpriteId::Think1) },
    RevealStep { delay_ms: 350, effect: RevealEffect::Show(SpriteId::Think2) },
    RevealStep { delay_ms: 350, effect: RevealEffect::Show(SpriteId::Think3) },
    RevealStep { delay_ms: 300, effect: RevealEffect::Fish },
];

/// Everything that hides when the cat gets out of bed
const BED_SCENE: [SpriteId; 5] = [
    SpriteId::CatBed,
    SpriteId::Think1,
    SpriteId::Think2,
    SpriteId::Think3,
    SpriteId::Fish,
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    Blink,
    Thinking,
    Fish,
    Stand,
    HatFade,
    Drag,
    Scene2,
}

impl fmt::Display for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SceneState::Blink => "BLINK",
            SceneState::Thinking => "THINKING",
            SceneState::Fish => "FISH",
            SceneState::Stand => "STAND",
            SceneState::HatFade => "HAT_FADE",
            SceneState::Drag => "DRAG",
            SceneState::Scene2 => "SCENE2",
        };
        f.write_str(name)
    }
}

/// Delayed work, delivered back through `on_task`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTask {
    BlinkTick,
    /// Index into `REVEAL_STEPS`
    Reveal(usize),
    HatFadeComplete,
    SceneFlashComplete,
}

/// Outcome of feeding a trigger to the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State changed
    Advanced { from: SceneState, to: SceneState },
    /// Side effects ran, state unchanged (blink frame, bubble, drag move…)
    Applied(SceneState),
    /// Trigger not valid in the current state; nothing changed
    Ignored,
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

pub struct SceneSequencer {
    state: SceneState,
    blink: BlinkLoop,
    drag: Option<DragController>,
    door: Zone,
}

impl SceneSequencer {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            state: SceneState::Blink,
            blink: BlinkLoop::new(SpriteId::CatBed),
            drag: None,
            door: config.zones.door,
        }
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(DragController::is_dragging)
    }

    /// Enter BLINK: eyes start blinking and the bed cat becomes clickable.
    pub fn start(&mut self, stage: &mut Stage, timers: &mut Scheduler<SceneTask>) {
        if self.state != SceneState::Blink {
            return;
        }
        self.blink.start(stage, timers);
        stage.effects_mut(SpriteId::CatBed).clickable = true;
        tracing::info!("Scene started in {}", self.state);
    }

    fn advance(&mut self, to: SceneState) -> Transition {
        let from = self.state;
        self.state = to;
        tracing::info!("Scene {} → {}", from, to);
        Transition::Advanced { from, to }
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Route a click on a stage element to its handler
    pub fn on_click(
        &mut self,
        target: SpriteId,
        stage: &mut Stage,
        timers: &mut Scheduler<SceneTask>,
    ) -> Transition {
        match target {
            SpriteId::CatBed => self.on_bed_cat_click(stage, timers),
            SpriteId::Fish => self.on_fish_click(stage),
            SpriteId::Hat => self.on_hat_click(stage, timers),
            _ => Transition::Ignored,
        }
    }

    /// Deliver a fired timer
    pub fn on_task(
        &mut self,
        task: SceneTask,
        stage: &mut Stage,
        timers: &mut Scheduler<SceneTask>,
    ) -> Transition {
        match task {
            SceneTask::BlinkTick => {
                if self.blink.tick(stage) {
                    Transition::Applied(self.state)
                } else {
                    Transition::Ignored
                }
            }
            SceneTask::Reveal(step) => self.on_reveal_step(step, stage, timers),
            SceneTask::HatFadeComplete => self.on_hat_fade_complete(stage),
            SceneTask::SceneFlashComplete => self.on_scene_flash_complete(stage),
        }
    }

    // -----------------------------------------------------------------------
    // BLINK → THINKING → FISH
    // -----------------------------------------------------------------------

    pub fn on_bed_cat_click(
        &mut self,
        stage: &mut Stage,
        timers: &mut Scheduler<SceneTask>,
    ) -> Transition {
        if self.state != SceneState::Blink {
            return Transition::Ignored;
        }
        self.blink.stop(stage, timers);
        stage.effects_mut(SpriteId::CatBed).clickable = false;

        timers.after(REVEAL_STEPS[0].delay_ms, SceneTask::Reveal(0));
        self.advance(SceneState::Thinking)
    }

    /// Run one reveal step and schedule the next one relative to it
    fn on_reveal_step(
        &mut self,
        step: usize,
        stage: &mut Stage,
        timers: &mut Scheduler<SceneTask>,
    ) -> Transition {
        if self.state != SceneState::Thinking {
            return Transition::Ignored;
        }
        let Some(current) = REVEAL_STEPS.get(step) else {
            return Transition::Ignored;
        };

        if let Some(next) = REVEAL_STEPS.get(step + 1) {
            timers.after(next.delay_ms, SceneTask::Reveal(step + 1));
        }

        match current.effect {
            RevealEffect::Show(id) => {
                stage.show(id);
                tracing::debug!("Thought bubble {:?} shown", id);
                Transition::Applied(self.state)
            }
            RevealEffect::Fish => {
                stage.show(SpriteId::Fish);
                let fx = stage.effects_mut(SpriteId::Fish);
                fx.fish_pulse = true;
                fx.clickable = true;
                self.advance(SceneState::Fish)
            }
        }
    }

    // -----------------------------------------------------------------------
    // FISH → STAND
    // -----------------------------------------------------------------------

    pub fn on_fish_click(&mut self, stage: &mut Stage) -> Transition {
        if self.state != SceneState::Fish {
            return Transition::Ignored;
        }
        let fx = stage.effects_mut(SpriteId::Fish);
        fx.clickable = false;
        fx.fish_pulse = false;

        for id in BED_SCENE {
            stage.hide(id);
        }
        stage.show(SpriteId::CatStand);

        let hat = stage.effects_mut(SpriteId::Hat);
        hat.pulse = true;
        hat.clickable = true;

        self.advance(SceneState::Stand)
    }

    // -----------------------------------------------------------------------
    // STAND → HAT_FADE → DRAG
    // -----------------------------------------------------------------------

    pub fn on_hat_click(
        &mut self,
        stage: &mut Stage,
        timers: &mut Scheduler<SceneTask>,
    ) -> Transition {
        if self.state != SceneState::Stand {
            return Transition::Ignored;
        }
        let hat = stage.effects_mut(SpriteId::Hat);
        hat.clickable = false;
        hat.pulse = false;
        hat.fade_out_since = Some(timers.now());

        timers.after(HAT_FADE_MS, SceneTask::HatFadeComplete);
        self.advance(SceneState::HatFade)
    }

    fn on_hat_fade_complete(&mut self, stage: &mut Stage) -> Transition {
        if self.state != SceneState::HatFade {
            return Transition::Ignored;
        }
        stage.hide(SpriteId::Hat);
        stage.hide(SpriteId::CatStand);
        stage.show(SpriteId::CatHat);

        if let Some(old) = self.drag.take() {
            old.detach(stage);
        }
        self.drag = Some(DragController::attach(stage, SpriteId::CatHat, self.door));
        self.advance(SceneState::Drag)
    }

    // -----------------------------------------------------------------------
    // DRAG → SCENE2
    // -----------------------------------------------------------------------

    /// Returns true if the gesture was taken by the drag controller.
    pub fn on_pointer_down(&mut self, stage: &mut Stage, p: ClientPoint) -> bool {
        if self.state != SceneState::Drag {
            return false;
        }
        match self.drag.as_mut() {
            Some(drag) => drag.on_pointer_down(stage, p),
            None => false,
        }
    }

    pub fn on_pointer_move(&mut self, stage: &mut Stage, p: ClientPoint) -> Transition {
        if self.state != SceneState::Drag {
            return Transition::Ignored;
        }
        let moved = self
            .drag
            .as_mut()
            .is_some_and(|drag| drag.on_pointer_move(stage, p));
        if moved {
            Transition::Applied(self.state)
        } else {
            Transition::Ignored
        }
    }

    pub fn on_pointer_up(
        &mut self,
        stage: &mut Stage,
        timers: &mut Scheduler<SceneTask>,
        p: ClientPoint,
    ) -> Transition {
        if self.state != SceneState::Drag {
            return Transition::Ignored;
        }
        let result = match self.drag.as_mut() {
            Some(drag) => drag.on_pointer_up(stage, p),
            None => DropResult::Nothing,
        };
        match result {
            DropResult::DroppedInZone { at } => {
                tracing::info!("Cat dropped at the door ({:.1}%, {:.1}%)", at.x_pct, at.y_pct);
                self.go_scene2(stage, timers)
            }
            DropResult::Dropped { at } => {
                tracing::debug!("Cat left at ({:.1}%, {:.1}%), still in {}", at.x_pct, at.y_pct, self.state);
                Transition::Applied(self.state)
            }
            DropResult::Nothing => Transition::Ignored,
        }
    }

    fn go_scene2(&mut self, stage: &mut Stage, timers: &mut Scheduler<SceneTask>) -> Transition {
        if let Some(drag) = self.drag.take() {
            drag.detach(stage);
        }
        stage.hide(SpriteId::CatHat);
        // Door-opening flash
        stage.show(SpriteId::Background2);

        timers.after(SCENE_FLASH_MS, SceneTask::SceneFlashComplete);
        self.advance(SceneState::Scene2)
    }

    fn on_scene_flash_complete(&mut self, stage: &mut Stage) -> Transition {
        if self.state != SceneState::Scene2 {
            return Transition::Ignored;
        }
        stage.hide(SpriteId::Background1);
        stage.hide(SpriteId::Background2);
        stage.show(SpriteId::Outside);
        stage.show(SpriteId::CatFishing);
        stage.show(SpriteId::Ripple);
        tracing::info!("Gone fishing");
        Transition::Applied(self.state)
    }
}
