// Reads light parameters out of an entity's free-form annotation (its "note").
// Recognized tag, case-insensitive:
//
//     <torchlight radius:120 color:#ffaa66 flicker>
//
// `flicker` is optional. Only the first well-formed tag counts; anything
// malformed or missing simply means "no light" and is not an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::color::Rgb;

static TORCH_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<torchlight\s*radius:(\d+)\s*color:(#[0-9a-f]{6})(\s*flicker)?>")
        .expect("torchlight tag pattern is valid")
});

/// Light parameters for one map entity. Immutable once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightDescriptor {
    pub radius: u32, // pixels, always > 0
    pub base_color: Rgb,
    pub flicker: bool,
}

/// Parse the first torchlight tag in `note`, or `None` when there isn't a
/// well-formed one. No defaults are filled in for partial tags.
pub fn parse_light_tag(note: &str) -> Option<LightDescriptor> {
    let caps = TORCH_TAG.captures(note)?;

    let radius: u32 = caps.get(1)?.as_str().parse().ok()?;
    if radius == 0 {
        return None;
    }
    let base_color = Rgb::from_hex(caps.get(2)?.as_str()).ok()?;
    let flicker = caps.get(3).is_some();

    Some(LightDescriptor { radius, base_color, flicker })
}
