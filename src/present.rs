// Lays the finished overlay over the scene image.
// Visual: with `Add` the torches brighten whatever is under them and overlapping
// glows stack toward white; `Normal` shows the darkness fill as a dimmed scene.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::surface::{OverlaySurface, Rgba};
use crate::types::FrameBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// scene + overlay.rgb * overlay.a, saturating per channel.
    #[default]
    Add,
    /// Ordinary alpha "over".
    Normal,
}

/// Composite `overlay` onto `scene` in place.
pub fn composite_onto(scene: &mut FrameBuffer, overlay: &OverlaySurface, mode: BlendMode) -> Result<(), Error> {
    if scene.width != overlay.width() || scene.height != overlay.height() {
        return Err(Error::SurfaceSize(format!(
            "scene {}x{} vs overlay {}x{}",
            scene.width,
            scene.height,
            overlay.width(),
            overlay.height()
        )));
    }

    for (dst, &src) in scene.pixels.iter_mut().zip(overlay.pixels()) {
        let o = Rgba::unpack(src);
        if o.a <= 0.0 {
            continue; // nothing drawn here
        }
        let s = Rgba::unpack(*dst);
        let mix = |sc: f32, oc: f32| -> u32 {
            let v = match mode {
                BlendMode::Add => sc + oc * o.a,
                BlendMode::Normal => oc * o.a + sc * (1.0 - o.a),
            };
            v.round().clamp(0.0, 255.0) as u32
        };
        *dst = (mix(s.r, o.r) << 16) | (mix(s.g, o.g) << 8) | mix(s.b, o.b);
    }
    Ok(())
}
