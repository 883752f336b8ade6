//! Tunable constants for the integrator and the render surface.
//!
//! Defaults carry the aesthetic parameters of the piece; the viewer edits
//! a copy of [`MorphConfig`] live.

/// Constants driving [`crate::morph`] and [`crate::engine::MorphEngine`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphConfig {
    /// Number of particles in a session.
    pub particle_count: usize,
    /// Exponential approach rate per second (`morphSpeed = rate * dt`).
    pub morph_rate: f32,
    /// Tension at or below which no jitter is applied.
    pub jitter_threshold: f32,
    /// Full jitter span at tension 1. Offsets fall in `±tension * scale / 2`.
    pub jitter_scale: f32,
    /// Extra target scale per unit expansion for breathing shapes.
    pub expansion_gain: f32,
    /// Extra target scale per unit expansion for fireworks.
    pub fireworks_gain: f32,
    /// Angular frequency of the fireworks detonation pulse.
    pub fireworks_pulse: f32,
    pub float_amplitude: f32,
    pub float_freq_x: f32,
    pub float_freq_y: f32,
    /// Phase offset between neighbouring particle indices.
    pub float_phase_step: f32,
    /// Spin about the vertical axis in radians per second at rest.
    pub base_spin: f32,
    /// Spin multiplier gained per unit tension.
    pub tension_spin_gain: f32,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            particle_count: 3000,
            morph_rate: 3.0,
            jitter_threshold: 0.05,
            jitter_scale: 0.1,
            expansion_gain: 2.0,
            fireworks_gain: 3.0,
            fireworks_pulse: 0.5,
            float_amplitude: 0.02,
            float_freq_x: 0.5,
            float_freq_y: 0.3,
            float_phase_step: 0.1,
            base_spin: 0.1,
            tension_spin_gain: 5.0,
        }
    }
}

/// How overlapping points combine on the render surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Additive,
    Normal,
}

/// Appearance of the point cloud. Owned by the UI, never read by the integrator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    /// sRGB color.
    pub color: [u8; 3],
    pub point_size: f32,
    pub opacity: f32,
    pub blend: BlendMode,
}

impl RenderConfig {
    /// Parses a `#rrggbb` color, leaving the current color untouched on failure.
    pub fn set_hex_color(&mut self, hex: &str) -> bool {
        match parse_hex_color(hex) {
            Some(color) => {
                self.color = color;
                true
            }
            None => false,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color: [0x4f, 0x46, 0xe5],
            point_size: 0.06,
            opacity: 0.8,
            blend: BlendMode::Additive,
        }
    }
}

fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.trim().strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}
