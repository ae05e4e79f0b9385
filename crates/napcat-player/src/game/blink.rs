//! Blink loop — the sleeping cat opens and closes its eyes.
//!
//! A 750 ms repeating timer swaps the bed-cat image between the eyes-open
//! and eyes-closed frames. Stopping cancels the timer and always leaves the
//! eyes open.

use crate::assets::AssetKey;
use crate::engine::stage::{SpriteId, Stage};
use crate::engine::timer::{Scheduler, TimerId};
use crate::game::sequencer::SceneTask;

pub const BLINK_INTERVAL_MS: u64 = 750;

#[derive(Debug)]
pub struct BlinkLoop {
    sprite: SpriteId,
    timer: Option<TimerId>,
    eyes_open: bool,
}

impl BlinkLoop {
    pub fn new(sprite: SpriteId) -> Self {
        Self {
            sprite,
            timer: None,
            eyes_open: true,
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Start from the eyes-open frame; the first tick closes them.
    pub fn start(&mut self, stage: &mut Stage, timers: &mut Scheduler<SceneTask>) {
        if let Some(old) = self.timer.take() {
            timers.cancel(old);
        }
        self.eyes_open = true;
        stage.set_source(self.sprite, AssetKey::CatEyesOpen);
        self.timer = Some(timers.every(BLINK_INTERVAL_MS, SceneTask::BlinkTick));
        tracing::debug!("Blink loop started");
    }

    /// Flip the frame. Ticks arriving after `stop` are ignored.
    pub fn tick(&mut self, stage: &mut Stage) -> bool {
        if self.timer.is_none() {
            return false;
        }
        self.eyes_open = !self.eyes_open;
        let frame = if self.eyes_open {
            AssetKey::CatEyesOpen
        } else {
            AssetKey::CatEyesClosed
        };
        stage.set_source(self.sprite, frame);
        true
    }

    /// Cancel the timer (safe when already stopped) and rest on eyes open.
    pub fn stop(&mut self, stage: &mut Stage, timers: &mut Scheduler<SceneTask>) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
            tracing::debug!("Blink loop stopped");
        }
        self.eyes_open = true;
        stage.set_source(self.sprite, AssetKey::CatEyesOpen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetStore;
    use napcat_common::StageRect;

    fn setup() -> (Stage, Scheduler<SceneTask>, BlinkLoop) {
        let stage = Stage::new(StageRect::sized(960.0, 540.0).unwrap(), &AssetStore::placeholders());
        (stage, Scheduler::new(), BlinkLoop::new(SpriteId::CatBed))
    }

    /// Advance the clock and feed blink ticks to the loop
    fn pump(stage: &mut Stage, timers: &mut Scheduler<SceneTask>, blink: &mut BlinkLoop, dt: u64) -> usize {
        let deadline = timers.deadline(dt);
        let mut ticks = 0;
        while let Some(task) = timers.pop_due(deadline) {
            if task == SceneTask::BlinkTick && blink.tick(stage) {
                ticks += 1;
            }
        }
        timers.settle(deadline);
        ticks
    }

    #[test]
    fn frames_alternate_every_interval() {
        let (mut stage, mut timers, mut blink) = setup();
        blink.start(&mut stage, &mut timers);
        assert_eq!(stage.source(SpriteId::CatBed), Some(AssetKey::CatEyesOpen));

        assert_eq!(pump(&mut stage, &mut timers, &mut blink, 749), 0);
        assert_eq!(pump(&mut stage, &mut timers, &mut blink, 1), 1);
        assert_eq!(stage.source(SpriteId::CatBed), Some(AssetKey::CatEyesClosed));

        assert_eq!(pump(&mut stage, &mut timers, &mut blink, 750), 1);
        assert_eq!(stage.source(SpriteId::CatBed), Some(AssetKey::CatEyesOpen));
    }

    #[test]
    fn stop_rests_on_eyes_open_after_any_tick_count() {
        for elapsed in [0, 750, 1500, 2250, 3000, 3001] {
            let (mut stage, mut timers, mut blink) = setup();
            blink.start(&mut stage, &mut timers);
            pump(&mut stage, &mut timers, &mut blink, elapsed);
            blink.stop(&mut stage, &mut timers);
            assert_eq!(
                stage.source(SpriteId::CatBed),
                Some(AssetKey::CatEyesOpen),
                "after {} ms",
                elapsed
            );
            assert!(!blink.is_running());
            assert_eq!(timers.pending(), 0);
        }
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut stage, mut timers, mut blink) = setup();
        blink.stop(&mut stage, &mut timers);
        blink.start(&mut stage, &mut timers);
        blink.stop(&mut stage, &mut timers);
        blink.stop(&mut stage, &mut timers);
        assert_eq!(stage.source(SpriteId::CatBed), Some(AssetKey::CatEyesOpen));
        assert_eq!(pump(&mut stage, &mut timers, &mut blink, 5000), 0);
    }

    #[test]
    fn stale_tick_after_stop_is_ignored() {
        let (mut stage, mut timers, mut blink) = setup();
        blink.start(&mut stage, &mut timers);
        blink.stop(&mut stage, &mut timers);
        assert!(!blink.tick(&mut stage));
        assert_eq!(stage.source(SpriteId::CatBed), Some(AssetKey::CatEyesOpen));
    }

    #[test]
    fn restart_replaces_timer() {
        let (mut stage, mut timers, mut blink) = setup();
        blink.start(&mut stage, &mut timers);
        blink.start(&mut stage, &mut timers);
        assert_eq!(timers.pending(), 1);
    }
}
