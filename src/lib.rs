//! Darkness overlay with radial light holes for a player lantern and
//! flickering map torches, rendered in software into an RGBA surface.
//!
//! Per displayed frame the host calls [`system::LightingSystem::render_frame`]
//! (or [`compositor::Compositor::render`] directly with its own flicker states).

pub mod color;
pub mod compositor;
pub mod config;
pub mod draw;
pub mod error;
pub mod flicker;
pub mod notes;
pub mod present;
pub mod surface;
pub mod system;
pub mod types;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use compositor::{Compositor, LitSource};
pub use config::LightingConfig;
pub use error::Error;
pub use flicker::{FlickerParams, FlickerState};
pub use notes::{LightDescriptor, parse_light_tag};
pub use surface::OverlaySurface;
pub use system::{LightingSystem, SwitchBoard, Switches};
pub use types::{FrameBuffer, ScreenPos};
