// Lifecycle glue between a host's map and the compositor.
// The host calls `on_light_source_created` when an entity is built and
// `render_frame` once per displayed frame; nothing is hooked implicitly.

use std::collections::{HashMap, HashSet};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::compositor::{Compositor, LitSource};
use crate::config::LightingConfig;
use crate::flicker::FlickerState;
use crate::notes::{LightDescriptor, parse_light_tag};
use crate::surface::OverlaySurface;
use crate::types::ScreenPos;

/// Host-side boolean switches (the lantern is gated by one of them).
pub trait Switches {
    fn value(&self, id: u32) -> bool;
}

impl<F: Fn(u32) -> bool> Switches for F {
    fn value(&self, id: u32) -> bool {
        self(id)
    }
}

/// Minimal switch store: the set of ids that are ON.
#[derive(Debug, Clone, Default)]
pub struct SwitchBoard {
    on: HashSet<u32>,
}

impl SwitchBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: u32, value: bool) {
        if value {
            self.on.insert(id);
        } else {
            self.on.remove(&id);
        }
    }

    /// Flip a switch and return its new value.
    pub fn toggle(&mut self, id: u32) -> bool {
        let next = !self.value(id);
        self.set(id, next);
        next
    }
}

impl Switches for SwitchBoard {
    fn value(&self, id: u32) -> bool {
        self.on.contains(&id)
    }
}

/// One light-emitting map entity.
#[derive(Debug, Clone)]
pub struct MapLight {
    /// None when the annotation has no well-formed tag; such entities never glow.
    pub descriptor: Option<LightDescriptor>,
    pub flicker: FlickerState,
}

/// Owns every map light's flicker state and drives the compositor.
pub struct LightingSystem {
    compositor: Compositor,
    lights: HashMap<u32, MapLight>,
    seeder: SmallRng, // hands each new light its own stream
}

impl LightingSystem {
    /// Flicker streams seeded from OS entropy.
    pub fn new(config: LightingConfig) -> Self {
        Self::with_seeder(config, SmallRng::from_entropy())
    }

    /// Reproducible flicker: same seed + same creation order = same animation.
    pub fn with_seed(config: LightingConfig, seed: u64) -> Self {
        Self::with_seeder(config, SmallRng::seed_from_u64(seed))
    }

    fn with_seeder(config: LightingConfig, seeder: SmallRng) -> Self {
        Self { compositor: Compositor::new(config), lights: HashMap::new(), seeder }
    }

    pub fn config(&self) -> &LightingConfig {
        self.compositor.config()
    }

    pub fn light(&self, id: u32) -> Option<&MapLight> {
        self.lights.get(&id)
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Register (or re-register) an entity. Re-creating an id starts a fresh flicker state.
    /// Returns the parsed descriptor, if any.
    pub fn on_light_source_created(&mut self, id: u32, annotation: &str) -> Option<LightDescriptor> {
        let descriptor = parse_light_tag(annotation);
        if descriptor.is_none() && annotation.to_ascii_lowercase().contains("<torchlight") {
            tracing::trace!(id, annotation, "Torchlight tag malformed; entity stays dark");
        }
        tracing::debug!(id, lit = descriptor.is_some(), "Light source registered");

        let flicker = FlickerState::new(&mut self.seeder);
        self.lights.insert(id, MapLight { descriptor, flicker });
        descriptor
    }

    pub fn on_light_source_removed(&mut self, id: u32) -> Option<MapLight> {
        let removed = self.lights.remove(&id);
        if removed.is_some() {
            tracing::debug!(id, "Light source removed");
        }
        removed
    }

    /// Advance every lit source's flicker exactly once.
    pub fn tick(&mut self) {
        let params = self.compositor.config().flicker;
        for light in self.lights.values_mut().filter(|l| l.descriptor.is_some()) {
            light.flicker.tick(&params);
        }
    }

    /// Composite with the current flicker states, without advancing them.
    /// `positions` lists (id, feet position) for entities on screen this frame;
    /// it also decides draw order. Unknown ids are skipped.
    pub fn composite(&self, surface: &mut OverlaySurface, player_pos: ScreenPos, switches: &impl Switches, positions: &[(u32, ScreenPos)]) {
        let player_on = switches.value(self.config().player.switch_id);
        let lit: Vec<LitSource<'_>> = positions
            .iter()
            .filter_map(|&(id, position)| {
                let light = self.lights.get(&id)?;
                Some(LitSource { position, descriptor: light.descriptor?, flicker: &light.flicker })
            })
            .collect();
        self.compositor.render(surface, player_pos, player_on, &lit);
    }

    /// One whole frame step: tick all flicker states, then composite.
    pub fn render_frame(&mut self, surface: &mut OverlaySurface, player_pos: ScreenPos, switches: &impl Switches, positions: &[(u32, ScreenPos)]) {
        self.tick();
        self.composite(surface, player_pos, switches, positions);
    }
}
