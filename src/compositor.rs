// Per-frame compositing: flat darkness, then one light hole per active light.
// Visual: the viewport goes dark; the lantern and each torch glow through it.

use crate::color::{Rgb, hue_shift_scaled};
use crate::config::LightingConfig;
use crate::draw::draw_light_hole;
use crate::flicker::FlickerState;
use crate::notes::LightDescriptor;
use crate::surface::{OverlaySurface, Rgba};
use crate::types::ScreenPos;

/// One map light for one frame: where it is, what it looks like, and how it flickers.
#[derive(Debug, Clone, Copy)]
pub struct LitSource<'a> {
    pub position: ScreenPos, // feet position on screen
    pub descriptor: LightDescriptor,
    pub flicker: &'a FlickerState,
}

/// Radius actually drawn: scaled by the flicker multiplier only for flickering lights.
#[inline]
pub fn effective_radius(base: u32, flicker: bool, multiplier: f32) -> f32 {
    if flicker { base as f32 * multiplier } else { base as f32 }
}

/// Stateless renderer. Holds configuration only; no per-source state.
pub struct Compositor {
    config: LightingConfig,
}

impl Compositor {
    pub fn new(config: LightingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LightingConfig {
        &self.config
    }

    /// Redraw the whole overlay for this frame.
    /// Reads flicker states without advancing them, so identical inputs give identical pixels.
    pub fn render(&self, surface: &mut OverlaySurface, player_pos: ScreenPos, player_light_on: bool, lights: &[LitSource<'_>]) {
        let cfg = &self.config;

        // 1+2) darkness layer
        surface.clear();
        surface.fill(Rgba::new(Rgb::new(0, 0, 0), cfg.darkness_alpha));

        // 3) lantern: fixed radius, color and alpha
        if player_light_on {
            draw_light_hole(
                surface,
                player_pos.raised(cfg.player.height_offset),
                cfg.player.radius,
                cfg.player.color,
                cfg.player.alpha,
            );
        }

        // 4) torches
        for light in lights {
            let d = &light.descriptor;
            let radius = effective_radius(d.radius, d.flicker, light.flicker.multiplier(&cfg.flicker));
            let color = hue_shift_scaled(d.base_color, light.flicker.hue(), cfg.flicker.hue_shift_scale);
            draw_light_hole(
                surface,
                light.position.raised(cfg.torch.height_offset),
                radius,
                color,
                cfg.torch.alpha,
            );
        }
    }
}
