// Torch flicker: a smoothed random target for the radius plus a slow hue random walk.
// Visual: torches breathe by about +/-12% of their radius and their tint wanders a little.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Tunables for every torch on the map. Defaults mirror the classic torch look.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickerParams {
    /// Fraction of the gap to the target closed each frame.
    pub speed: f32,
    /// Radius swing at full offset: multiplier = 1 + value * range.
    pub range: f32,
    /// Per-frame chance of picking a new target ("gust").
    pub retarget_chance: f32,
    /// Width of the uniform hue step; each frame adds uniform(-step/2, step/2).
    pub hue_step: f32,
    /// Hue rotation (in turns) applied per unit of hue state when drawing.
    pub hue_shift_scale: f32,
}

impl Default for FlickerParams {
    fn default() -> Self {
        Self {
            speed: 0.03,
            range: 0.12,
            retarget_chance: 0.02,
            hue_step: 0.01,
            hue_shift_scale: crate::color::HUE_SHIFT_SCALE,
        }
    }
}

/// Per-torch flicker state. Owned by exactly one light source and never shared.
#[derive(Debug, Clone)]
pub struct FlickerState {
    value: f32,  // current smoothed offset, [-1,1]
    target: f32, // attractor, [-1,1]
    hue: f32,    // wrapping hue state, [0,1)
    rng: SmallRng,
}

impl FlickerState {
    /// Fresh state with its own random stream seeded from `seed_rng`.
    pub fn new<R: Rng>(seed_rng: &mut R) -> Self {
        Self::seeded(seed_rng.r#gen())
    }

    /// Deterministic state; the same seed always flickers the same way.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let target = rng.gen_range(-1.0..=1.0);
        let hue = rng.r#gen::<f32>();
        Self { value: 0.0, target, hue, rng }
    }

    /// Build from explicit values (snapshots, tests). Inputs are clamped/wrapped into range.
    pub fn from_parts(value: f32, target: f32, hue: f32, seed: u64) -> Self {
        Self {
            value: value.clamp(-1.0, 1.0),
            target: target.clamp(-1.0, 1.0),
            hue: wrap_unit(hue),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn hue(&self) -> f32 {
        self.hue
    }

    /// Radius multiplier for the current value, without advancing.
    #[inline]
    pub fn multiplier(&self, params: &FlickerParams) -> f32 {
        1.0 + self.value * params.range
    }

    /// Advance one frame and return the new radius multiplier.
    /// Must run exactly once per rendered frame.
    pub fn tick(&mut self, params: &FlickerParams) -> f32 {
        // NaN or <= 0 never retargets; gen_bool panics outside [0,1]
        let chance = params.retarget_chance;
        if chance > 0.0 && self.rng.gen_bool(chance.min(1.0) as f64) {
            self.target = self.rng.gen_range(-1.0..=1.0);
        }

        // value and target both in [-1,1] and speed in (0,1] keep value in [-1,1];
        // the clamp only absorbs float rounding
        self.value += (self.target - self.value) * params.speed;
        self.value = self.value.clamp(-1.0, 1.0);

        let half = params.hue_step * 0.5;
        if half > 0.0 {
            self.hue = wrap_unit(self.hue + self.rng.gen_range(-half..half));
        }

        self.multiplier(params)
    }
}

/// Wrap into [0,1). `rem_euclid` can return exactly 1.0 for tiny negatives.
#[inline]
fn wrap_unit(x: f32) -> f32 {
    let w = x.rem_euclid(1.0);
    if w >= 1.0 { 0.0 } else { w }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_at_rest() {
        let s = FlickerState::seeded(7);
        assert_eq!(s.value(), 0.0);
        assert!((-1.0..=1.0).contains(&s.target()));
        assert!((0.0..1.0).contains(&s.hue()));
    }

    #[test]
    fn test_same_seed_same_flicker() {
        let params = FlickerParams::default();
        let mut a = FlickerState::seeded(42);
        let mut b = FlickerState::seeded(42);
        for _ in 0..500 {
            assert_eq!(a.tick(&params), b.tick(&params));
            assert_eq!(a.hue(), b.hue());
        }
    }

    #[test]
    fn test_bounds_hold_for_10k_frames() {
        let params = FlickerParams::default();
        let starts = [
            FlickerState::from_parts(1.0, 1.0, 0.0, 1),
            FlickerState::from_parts(-1.0, -1.0, 0.999, 2),
            FlickerState::from_parts(0.0, 1.0, 0.5, 3),
            FlickerState::from_parts(-1.0, 1.0, 0.25, 4),
            FlickerState::seeded(5),
        ];
        for mut s in starts {
            for _ in 0..10_000 {
                let m = s.tick(&params);
                assert!((-1.0..=1.0).contains(&s.value()));
                assert!((0.88 - 1e-6..=1.12 + 1e-6).contains(&m), "multiplier {m}");
                assert!((0.0..1.0).contains(&s.hue()));
            }
        }
    }

    #[test]
    fn test_smoothing_step() {
        // retarget disabled so the step is exactly the filter
        let params = FlickerParams { retarget_chance: 0.0, hue_step: 0.0, ..Default::default() };
        let mut s = FlickerState::from_parts(0.0, 1.0, 0.3, 9);
        let m = s.tick(&params);
        assert!((s.value() - 0.03).abs() < 1e-6);
        assert!((m - (1.0 + 0.03 * 0.12)).abs() < 1e-6);
        assert_eq!(s.hue(), 0.3);

        // ~33 frames covers about 63% of the gap
        for _ in 1..33 {
            s.tick(&params);
        }
        assert!((s.value() - 0.63).abs() < 0.02, "{}", s.value());
    }

    #[test]
    fn test_retarget_always_when_chance_is_one() {
        let params = FlickerParams { retarget_chance: 1.0, ..Default::default() };
        let mut s = FlickerState::from_parts(0.0, 5.0, 0.0, 11);
        assert_eq!(s.target(), 1.0);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..20 {
            s.tick(&params);
            seen.insert(s.target().to_bits());
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_nan_retarget_chance_never_retargets() {
        let params = FlickerParams { retarget_chance: f32::NAN, ..Default::default() };
        let mut s = FlickerState::from_parts(0.0, 0.5, 0.2, 17);
        for _ in 0..1_000 {
            let m = s.tick(&params);
            assert_eq!(s.target(), 0.5);
            assert!(m.is_finite());
        }

        let params = FlickerParams { retarget_chance: 7.0, ..Default::default() };
        s.tick(&params);
        assert_ne!(s.target(), 0.5);
    }

    #[test]
    fn test_hue_walk_is_small_and_wraps() {
        let params = FlickerParams::default();
        let mut s = FlickerState::from_parts(0.0, 0.0, 0.001, 13);
        let mut prev = s.hue();
        for _ in 0..5_000 {
            s.tick(&params);
            let h = s.hue();
            let step = (h - prev).abs();
            // either a small step or a wrap across 0/1
            assert!(step <= 0.005 + 1e-6 || step >= 1.0 - 0.005 - 1e-6, "step {step}");
            prev = h;
        }
    }

    #[test]
    fn test_wrap_unit() {
        assert_eq!(wrap_unit(1.0), 0.0);
        assert!((wrap_unit(-0.25) - 0.75).abs() < 1e-6);
        assert!((0.0..1.0).contains(&wrap_unit(-1e-12)));
    }
}
