//! Engine — minifb window, input polling, and the frame loop.
//!
//! The stage is rendered into a fixed 960×540 logical framebuffer which is
//! then scaled to whatever size the window currently has. Mouse positions
//! are mapped back into logical stage pixels before they reach the game.

pub mod render;
pub mod stage;
pub mod timer;

use std::time::{Duration, Instant};

use anyhow::Result;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use napcat_common::{SceneConfig, StageRect};

use crate::assets::AssetStore;
use crate::engine::render::Frame;
use crate::game::GameState;

pub const STAGE_WIDTH: usize = 960;
pub const STAGE_HEIGHT: usize = 540;
const FPS: u64 = 60;
/// Longest clock step after a stall (window drag, debugger pause)
const MAX_STEP_MS: u64 = 100;

/// Turns measured frame durations into whole-millisecond clock steps. The
/// sub-millisecond remainder is carried to the next frame, so scripted
/// delays keep their wall-clock length at any frame rate.
#[derive(Debug, Default)]
struct FrameClock {
    carry_us: u64,
}

impl FrameClock {
    fn step(&mut self, elapsed: Duration) -> u64 {
        let elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        let total_us = self.carry_us + elapsed_us.min(MAX_STEP_MS * 1000);
        self.carry_us = total_us % 1000;
        total_us / 1000
    }
}

/// Run the scene until the window is closed
pub fn run(assets: AssetStore, config: SceneConfig, debug_overlay: bool) -> Result<()> {
    let rect = StageRect::sized(STAGE_WIDTH as f32, STAGE_HEIGHT as f32)?;
    let mut game = GameState::new(assets, config, rect);
    if debug_overlay {
        game.debug.set_enabled(true, &mut game.stage);
    }

    let options = WindowOptions {
        resize: true,
        scale_mode: minifb::ScaleMode::AspectRatioStretch,
        ..Default::default()
    };
    let mut window = Window::new("napcat", STAGE_WIDTH, STAGE_HEIGHT, options)
        .map_err(|e| anyhow::anyhow!("Window creation failed: {}", e))?;
    window.set_target_fps(FPS as usize);

    // Internal framebuffer at logical resolution
    let mut framebuffer = vec![0u32; STAGE_WIDTH * STAGE_HEIGHT];

    // Output buffer, sized to match window
    let mut out_w = STAGE_WIDTH;
    let mut out_h = STAGE_HEIGHT;
    let mut scaled_buf = vec![0u32; out_w * out_h];
    let mut frame_count: u64 = 0;
    let mut cursor = game.cursor();
    let mut clock = FrameClock::default();
    let mut last_frame = Instant::now();

    tracing::info!("Engine initialized, entering game loop");
    tracing::info!("Controls: click the cat | D=debug overlay | Esc=quit");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        // Track window size changes; a minimised window reports 0×0
        let (actual_w, actual_h) = window.get_size();
        if actual_w > 0 && actual_h > 0 && (actual_w != out_w || actual_h != out_h) {
            out_w = actual_w;
            out_h = actual_h;
            scaled_buf.resize(out_w * out_h, 0);
            tracing::debug!("Window resized to {}×{}", out_w, out_h);
        }

        // Mouse → logical stage pixels
        let (mouse_x, mouse_y) = window
            .get_mouse_pos(MouseMode::Clamp)
            .unwrap_or((0.0, 0.0));
        let mx = (mouse_x * STAGE_WIDTH as f32 / out_w as f32).clamp(0.0, STAGE_WIDTH as f32 - 1.0);
        let my = (mouse_y * STAGE_HEIGHT as f32 / out_h as f32).clamp(0.0, STAGE_HEIGHT as f32 - 1.0);
        let mouse_down = window.get_mouse_down(MouseButton::Left);

        game.on_mouse_state(mx, my, mouse_down);

        for key in window.get_keys_pressed(KeyRepeat::No) {
            let shift = window.is_key_down(Key::LeftShift) || window.is_key_down(Key::RightShift);
            if let Some(ch) = key_to_char(key, shift) {
                game.on_char_input(ch);
            }
        }

        let now = Instant::now();
        game.update(clock.step(now - last_frame));
        last_frame = now;

        let next_cursor = game.cursor();
        if next_cursor != cursor {
            cursor = next_cursor;
            window.set_cursor_style(cursor.style());
        }

        // Render
        let mut frame = Frame {
            pixels: &mut framebuffer,
            width: STAGE_WIDTH,
            height: STAGE_HEIGHT,
        };
        render::render_stage(&mut frame, &game.stage, &game.assets, game.now());

        frame_count += 1;
        if frame_count % 5 == 0 {
            let title = if game.sequencer.is_dragging() {
                format!("napcat – {} (dragging)", game.state())
            } else {
                format!("napcat – {}", game.state())
            };
            window.set_title(&title);
        }

        // Scale to output size and present
        render::scale_to_size(
            &framebuffer,
            STAGE_WIDTH,
            STAGE_HEIGHT,
            &mut scaled_buf,
            out_w,
            out_h,
        );
        window
            .update_with_buffer(&scaled_buf, out_w, out_h)
            .map_err(|e| anyhow::anyhow!("Display error: {}", e))?;
    }

    tracing::info!("Engine shutdown in {}", game.state());
    Ok(())
}

/// Convert minifb Key to a char for keyboard shortcuts
fn key_to_char(key: Key, shift: bool) -> Option<char> {
    let ch = match key {
        Key::A => 'a', Key::B => 'b', Key::C => 'c', Key::D => 'd',
        Key::E => 'e', Key::F => 'f', Key::G => 'g', Key::H => 'h',
        Key::I => 'i', Key::J => 'j', Key::K => 'k', Key::L => 'l',
        Key::M => 'm', Key::N => 'n', Key::O => 'o', Key::P => 'p',
        Key::Q => 'q', Key::R => 'r', Key::S => 's', Key::T => 't',
        Key::U => 'u', Key::V => 'v', Key::W => 'w', Key::X => 'x',
        Key::Y => 'y', Key::Z => 'z',
        Key::Space => ' ',
        _ => return None,
    };
    if shift {
        Some(ch.to_ascii_uppercase())
    } else {
        Some(ch)
    }
}
