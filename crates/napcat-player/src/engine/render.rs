//! Software renderer — draws the stage into a 32-bit ARGB framebuffer.
//!
//! Images are nearest-neighbour scaled into their element box and alpha
//! blended. Pulse and fade are computed from the element's effect flags and
//! the current virtual time, so the stage itself never animates.

use std::f32::consts::TAU;

use crate::assets::bitmap::DecodedBitmap;
use crate::assets::AssetStore;
use crate::engine::stage::{ClientBox, Effects, Stage, Visual};
use crate::game::sequencer::HAT_FADE_MS;

/// Hat pulse: period and amplitude
const PULSE_PERIOD_MS: f32 = 1200.0;
const PULSE_AMPLITUDE: f32 = 0.06;
/// Fish pulse is quicker and bigger
const FISH_PULSE_PERIOD_MS: f32 = 800.0;
const FISH_PULSE_AMPLITUDE: f32 = 0.12;

const RIPPLE_PERIOD_MS: f32 = 2400.0;
const RIPPLE_RINGS: usize = 3;

const DOT_COLOR: u32 = 0xFFFF3030;
const DOT_RADIUS: i32 = 4;
const OUTLINE_COLOR: u32 = 0xFFFFE040;
const RIPPLE_COLOR: [u8; 3] = [0xDD, 0xEE, 0xFF];

/// Target framebuffer
pub struct Frame<'a> {
    pub pixels: &'a mut [u32],
    pub width: usize,
    pub height: usize,
}

impl Frame<'_> {
    fn put(&mut self, x: i32, y: i32, rgb: [u8; 3], alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.pixels[idx] = blend(self.pixels[idx], rgb, alpha);
    }
}

/// Size multiplier for pulsing elements at time `now`
pub fn pulse_scale(fx: &Effects, now: u64) -> f32 {
    let t = now as f32;
    if fx.fish_pulse {
        1.0 + FISH_PULSE_AMPLITUDE * (TAU * t / FISH_PULSE_PERIOD_MS).sin().abs()
    } else if fx.pulse {
        1.0 + PULSE_AMPLITUDE * (TAU * t / PULSE_PERIOD_MS).sin().abs()
    } else {
        1.0
    }
}

/// Opacity multiplier, 1.0 unless the element is fading out
pub fn fade_alpha(fx: &Effects, now: u64) -> f32 {
    match fx.fade_out_since {
        Some(since) => {
            let elapsed = now.saturating_sub(since) as f32;
            (1.0 - elapsed / HAT_FADE_MS as f32).clamp(0.0, 1.0)
        }
        None => 1.0,
    }
}

/// Draw every visible element back-to-front
pub fn render_stage(frame: &mut Frame<'_>, stage: &Stage, assets: &AssetStore, now: u64) {
    frame.pixels.fill(0xFF000000);

    for el in stage.draw_order() {
        if !el.visible {
            continue;
        }
        let alpha = fade_alpha(&el.effects, now);
        if alpha <= 0.0 {
            continue;
        }
        let area = grow(stage.client_box(el.id), pulse_scale(&el.effects, now));

        match el.visual {
            Visual::Image(key) => {
                if let Some(bitmap) = assets.get(key) {
                    blit_scaled(frame, bitmap, area, alpha);
                }
            }
            Visual::Dot => {
                let c = area.center();
                fill_rect(
                    frame,
                    c.x as i32 - DOT_RADIUS,
                    c.y as i32 - DOT_RADIUS,
                    DOT_RADIUS * 2,
                    DOT_RADIUS * 2,
                    DOT_COLOR,
                );
            }
            Visual::Outline => draw_outline(frame, area, OUTLINE_COLOR),
            Visual::Ripple => draw_ripple(frame, area, now),
        }
    }
}

/// Scale a box around its center
fn grow(b: ClientBox, factor: f32) -> ClientBox {
    if factor == 1.0 {
        return b;
    }
    let c = b.center();
    let width = b.width * factor;
    let height = b.height * factor;
    ClientBox {
        left: c.x - width / 2.0,
        top: c.y - height / 2.0,
        width,
        height,
    }
}

/// Blit an RGBA bitmap into `area` with nearest-neighbour scaling
fn blit_scaled(frame: &mut Frame<'_>, bitmap: &DecodedBitmap, area: ClientBox, alpha: f32) {
    if bitmap.width == 0 || bitmap.height == 0 || area.width < 1.0 || area.height < 1.0 {
        return;
    }
    let x0 = area.left.round() as i32;
    let y0 = area.top.round() as i32;
    let w = area.width.round() as i32;
    let h = area.height.round() as i32;

    for dy in 0..h {
        let y = y0 + dy;
        if y < 0 || y >= frame.height as i32 {
            continue;
        }
        let sy = (dy as u32 * bitmap.height) / h as u32;
        for dx in 0..w {
            let x = x0 + dx;
            if x < 0 || x >= frame.width as i32 {
                continue;
            }
            let sx = (dx as u32 * bitmap.width) / w as u32;
            let [r, g, b, a] = bitmap.rgba(sx, sy);
            if a == 0 {
                continue; // Fully transparent
            }
            frame.put(x, y, [r, g, b], alpha * a as f32 / 255.0);
        }
    }
}

fn fill_rect(frame: &mut Frame<'_>, x: i32, y: i32, w: i32, h: i32, color: u32) {
    let rgb = unpack(color);
    for py in y..y + h {
        for px in x..x + w {
            frame.put(px, py, rgb, 1.0);
        }
    }
}

/// 2px rectangle outline
fn draw_outline(frame: &mut Frame<'_>, area: ClientBox, color: u32) {
    let x = area.left.round() as i32;
    let y = area.top.round() as i32;
    let w = area.width.round() as i32;
    let h = area.height.round() as i32;
    fill_rect(frame, x, y, w, 2, color);
    fill_rect(frame, x, y + h - 2, w, 2, color);
    fill_rect(frame, x, y, 2, h, color);
    fill_rect(frame, x + w - 2, y, 2, h, color);
}

/// Expanding elliptical rings inside `area`, fading as they grow
fn draw_ripple(frame: &mut Frame<'_>, area: ClientBox, now: u64) {
    let c = area.center();
    let rx_max = area.width / 2.0;
    let ry_max = area.height / 2.0;
    if rx_max < 1.0 || ry_max < 1.0 {
        return;
    }
    let phase = (now as f32 % RIPPLE_PERIOD_MS) / RIPPLE_PERIOD_MS;

    for ring in 0..RIPPLE_RINGS {
        let t = (phase + ring as f32 / RIPPLE_RINGS as f32).fract();
        let rx = rx_max * t;
        let ry = ry_max * t;
        let alpha = 0.35 * (1.0 - t);
        if rx < 1.0 || alpha <= 0.0 {
            continue;
        }
        // One point per pixel of circumference is enough at this size
        let steps = (TAU * rx.max(ry)).ceil() as usize;
        for i in 0..steps {
            let a = TAU * i as f32 / steps as f32;
            let x = (c.x + rx * a.cos()).round() as i32;
            let y = (c.y + ry * a.sin()).round() as i32;
            frame.put(x, y, RIPPLE_COLOR, alpha);
        }
    }
}

fn unpack(color: u32) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

fn blend(dst: u32, rgb: [u8; 3], alpha: f32) -> u32 {
    if alpha >= 1.0 {
        return 0xFF000000 | (rgb[0] as u32) << 16 | (rgb[1] as u32) << 8 | rgb[2] as u32;
    }
    let a = (alpha.clamp(0.0, 1.0) * 255.0) as u32;
    let inv_a = 255 - a;
    let [dr, dg, db] = unpack(dst);
    let r = (rgb[0] as u32 * a + dr as u32 * inv_a) / 255;
    let g = (rgb[1] as u32 * a + dg as u32 * inv_a) / 255;
    let b = (rgb[2] as u32 * a + db as u32 * inv_a) / 255;
    0xFF000000 | (r << 16) | (g << 8) | b
}

/// Scale a framebuffer to any target size using per-axis nearest-neighbour
/// sampling.
pub fn scale_to_size(
    src: &[u32],
    src_w: usize,
    src_h: usize,
    dst: &mut [u32],
    dst_w: usize,
    dst_h: usize,
) {
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return;
    }
    for dy in 0..dst_h {
        let sy = (dy * src_h) / dst_h;
        let dst_row = dy * dst_w;
        let src_row = sy * src_w;
        for dx in 0..dst_w {
            let sx = (dx * src_w) / dst_w;
            dst[dst_row + dx] = src[src_row + sx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::stage::{BoxSize, SpriteId};
    use napcat_common::{Anchor, StageRect};

    const W: usize = 100;
    const H: usize = 50;

    fn stage() -> Stage {
        Stage::new(StageRect::sized(W as f32, H as f32).unwrap(), &AssetStore::placeholders())
    }

    fn render(stage: &Stage, now: u64) -> Vec<u32> {
        let mut pixels = vec![0u32; W * H];
        let mut frame = Frame { pixels: &mut pixels, width: W, height: H };
        render_stage(&mut frame, stage, &AssetStore::placeholders(), now);
        pixels
    }

    #[test]
    fn pulse_stays_in_range() {
        let fx = Effects { pulse: true, ..Default::default() };
        let fish = Effects { fish_pulse: true, ..Default::default() };
        for now in (0..5000).step_by(37) {
            let p = pulse_scale(&fx, now);
            assert!((1.0..=1.0 + PULSE_AMPLITUDE + 1e-6).contains(&p));
            let f = pulse_scale(&fish, now);
            assert!((1.0..=1.0 + FISH_PULSE_AMPLITUDE + 1e-6).contains(&f));
        }
        assert_eq!(pulse_scale(&Effects::default(), 300), 1.0);
    }

    #[test]
    fn fade_runs_out_over_hat_fade() {
        let fx = Effects { fade_out_since: Some(1000), ..Default::default() };
        assert_eq!(fade_alpha(&fx, 1000), 1.0);
        assert!((fade_alpha(&fx, 1000 + HAT_FADE_MS / 2) - 0.5).abs() < 0.01);
        assert_eq!(fade_alpha(&fx, 1000 + HAT_FADE_MS), 0.0);
        assert_eq!(fade_alpha(&fx, 999), 1.0);
    }

    #[test]
    fn opening_scene_draws_background() {
        let s = stage();
        let fb = render(&s, 0);
        // Background fills the whole stage
        assert!(fb.iter().all(|&p| p != 0xFF000000));
    }

    #[test]
    fn hidden_elements_are_not_drawn() {
        let mut s = stage();
        for id in SpriteId::ALL {
            s.hide(id);
        }
        let fb = render(&s, 0);
        assert!(fb.iter().all(|&p| p == 0xFF000000));
    }

    #[test]
    fn faded_out_element_disappears() {
        let mut s = stage();
        for id in SpriteId::ALL {
            s.hide(id);
        }
        s.show(SpriteId::Hat);
        s.set_position(SpriteId::Hat, Anchor::new(50.0, 50.0));
        s.set_size(SpriteId::Hat, BoxSize::Explicit { w_pct: 20.0, h_pct: 20.0 });
        assert_ne!(render(&s, 0)[25 * W + 50], 0xFF000000);

        s.effects_mut(SpriteId::Hat).fade_out_since = Some(0);
        assert_eq!(render(&s, HAT_FADE_MS)[25 * W + 50], 0xFF000000);
    }

    #[test]
    fn blend_half() {
        let out = blend(0xFF000000, [200, 100, 0], 0.5);
        let [r, g, b] = unpack(out);
        assert!((99..=100).contains(&r));
        assert!((49..=50).contains(&g));
        assert_eq!(b, 0);
        assert_eq!(blend(0xFF123456, [1, 2, 3], 1.0), 0xFF010203);
    }

    #[test]
    fn scale_doubles_pixels() {
        let src = [1, 2, 3, 4];
        let mut dst = [0u32; 16];
        scale_to_size(&src, 2, 2, &mut dst, 4, 4);
        assert_eq!(&dst[0..4], &[1, 1, 2, 2]);
        assert_eq!(&dst[12..16], &[3, 3, 4, 4]);
    }
}
