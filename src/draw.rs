// Software drawing for the overlay.
// Visual effects provided here:
// 1) A "light hole": a soft radial glow with a bright core that fades to nothing at its edge.
// 2) A small solid marker on the scene so you can see where the player stands.

use crate::color::Rgb;
use crate::surface::{OverlaySurface, Rgba};
use crate::types::{FrameBuffer, ScreenPos};

/// Core of the glow is brighter than the nominal alpha (bloom).
pub const CORE_ALPHA_SCALE: f32 = 1.2;
/// Where the middle stop sits, as a fraction of the radius.
pub const MID_STOP: f32 = 0.6;
/// Alpha at the middle stop, relative to the nominal alpha.
pub const MID_ALPHA_SCALE: f32 = 0.5;

/// Alpha of a light hole at `t` = distance / radius, following the three stops:
/// 0 -> 1.2a, 0.6 -> 0.5a, 1 -> transparent. Interpolated linearly between stops.
/// Stop alphas are clamped to 1 first, as a canvas color stop would be.
#[inline]
pub fn gradient_alpha(t: f32, alpha: f32) -> f32 {
    let core = (alpha * CORE_ALPHA_SCALE).clamp(0.0, 1.0);
    let mid = (alpha * MID_ALPHA_SCALE).clamp(0.0, 1.0);
    if t <= 0.0 {
        core
    } else if t <= MID_STOP {
        core + (mid - core) * (t / MID_STOP)
    } else if t < 1.0 {
        mid * (1.0 - (t - MID_STOP) / (1.0 - MID_STOP))
    } else {
        0.0
    }
}

/// Paint a radial light hole centered at `center`.
/// The outer stop is transparent black; interpolating in premultiplied space
/// keeps the hue constant across the falloff, so only alpha varies.
/// Visual: a soft disc of `color`, brightest in the middle, vanishing at `radius`.
pub fn draw_light_hole(surface: &mut OverlaySurface, center: ScreenPos, radius: f32, color: Rgb, alpha: f32) {
    if !(radius > 0.0) || !radius.is_finite() || alpha <= 0.0 {
        return;
    }

    // Scan just the bounding box, clipped to the surface
    let x0 = (center.x - radius).floor().max(0.0) as i32;
    let y0 = (center.y - radius).floor().max(0.0) as i32;
    let x1 = ((center.x + radius).ceil() as i32).min(surface.width() as i32 - 1);
    let y1 = ((center.y + radius).ceil() as i32).min(surface.height() as i32 - 1);
    if x0 > x1 || y0 > y1 {
        return;
    }

    let r2 = radius * radius;
    for y in y0..=y1 {
        // sample at the pixel center
        let dy = y as f32 + 0.5 - center.y;
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - center.x;
            let d2 = dx * dx + dy * dy;
            if d2 > r2 {
                continue; // outside the arc
            }
            let a = gradient_alpha(d2.sqrt() / radius, alpha);
            surface.blend_pixel(x, y, Rgba::new(color, a));
        }
    }
}

/// Solid filled disc on the (opaque) scene buffer.
/// Visual: the player "token" the lantern follows.
pub fn draw_marker(fb: &mut FrameBuffer, center: ScreenPos, radius: i32, color: u32) {
    let (cx, cy) = (center.x.round() as i32, center.y.round() as i32);
    let r2 = radius * radius;
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            if x < 0 || y < 0 || x as usize >= fb.width || y as usize >= fb.height {
                continue;
            }
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r2 {
                fb.pixels[y as usize * fb.width + x as usize] = color;
            }
        }
    }
}
