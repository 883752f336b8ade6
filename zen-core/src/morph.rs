//! Per-tick integrator phases for the particle cloud.
//!
//! For each particle `i` with target `T[i]`, one tick runs:
//! 1. [`scaled_target`] — breathing scale, or the fireworks pulse.
//! 2. [`jitter`] — tension-driven random offset, off below the threshold.
//! 3. [`approach`] — exponential approach of the live position by
//!    [`morph_factor`].
//!
//! Two effects live outside the stored positions:
//! - [`float_offset`] only touches what is rendered (see [`render_into`]).
//! - [`spin_step`] turns the whole cloud's reference frame.

use crate::{
    config::MorphConfig, interaction::InteractionState, shape::ShapeKind, types::ParticleId,
};
use glam::Vec3;
use rand::Rng;

/// Detonation envelope for fireworks: swings between 0 and 4.
#[inline]
pub fn explosion_pulse(elapsed: f32, cfg: &MorphConfig) -> f32 {
    ((elapsed * cfg.fireworks_pulse).sin() + 1.0) * 2.0
}

/// Scale factor applied to every target of `shape` this tick.
///
/// - Fireworks: `pulse + expansion * 3`.
/// - Everything else: `1 + expansion * 2`, i.e. 1x at rest, 3x fully spread.
#[inline]
pub fn target_scale(shape: ShapeKind, expansion: f32, elapsed: f32, cfg: &MorphConfig) -> f32 {
    if shape.is_pulsing() {
        explosion_pulse(elapsed, cfg) + expansion * cfg.fireworks_gain
    } else {
        1.0 + expansion * cfg.expansion_gain
    }
}

/// Target position after the expansion phase.
#[inline]
pub fn scaled_target(
    target: Vec3,
    shape: ShapeKind,
    expansion: f32,
    elapsed: f32,
    cfg: &MorphConfig,
) -> Vec3 {
    target * target_scale(shape, expansion, elapsed, cfg)
}

/// Random per-axis offset in `±tension * jitter_scale / 2`.
///
/// Returns zero at or below `cfg.jitter_threshold`, and draws nothing from
/// `rng` in that case. Negative tension counts as zero.
pub fn jitter(tension: f32, cfg: &MorphConfig, rng: &mut impl Rng) -> Vec3 {
    let tension = tension.max(0.0);
    if tension <= cfg.jitter_threshold {
        return Vec3::ZERO;
    }
    let span = tension * cfg.jitter_scale;
    let mut axis = || (rng.random::<f32>() - 0.5) * span;
    Vec3::new(axis(), axis(), axis())
}

/// Fraction of the remaining distance covered this tick.
///
/// `morph_rate * dt`, capped at 1 so an oversized frame lands on the target
/// instead of overshooting it.
#[inline]
pub fn morph_factor(dt: f32, cfg: &MorphConfig) -> f32 {
    (cfg.morph_rate * dt).clamp(0.0, 1.0)
}

/// Moves `live` toward `goal` by `factor` of the remaining distance.
#[inline]
pub fn approach(live: Vec3, goal: Vec3, factor: f32) -> Vec3 {
    live + (goal - live) * factor
}

/// Idle float for particle `i`, added to rendered x/y only.
///
/// The `i`-dependent phase keeps neighbours from bobbing in unison.
#[inline]
pub fn float_offset(i: ParticleId, elapsed: f32, cfg: &MorphConfig) -> Vec3 {
    let phase = i as f32 * cfg.float_phase_step;
    Vec3::new(
        (elapsed * cfg.float_freq_x + phase).sin() * cfg.float_amplitude,
        (elapsed * cfg.float_freq_y + phase).cos() * cfg.float_amplitude,
        0.0,
    )
}

/// Rotation about the vertical axis for this tick, in radians.
///
/// Spins faster under tension: `dt * 0.1 * (1 + tension * 5)`.
#[inline]
pub fn spin_step(tension: f32, dt: f32, cfg: &MorphConfig) -> f32 {
    dt * cfg.base_spin * (1.0 + tension.max(0.0) * cfg.tension_spin_gain)
}

/// Advances every live position one tick toward its paired target.
///
/// `live[i]` always chases `target[i]`; nothing is matched by content.
/// `elapsed` is the session clock including this tick. Non-finite
/// interaction values are treated as idle.
///
/// ### Panics
/// Panics if the two buffers have different lengths.
#[allow(clippy::too_many_arguments)]
pub fn advance(
    live: &mut [Vec3],
    target: &[Vec3],
    interaction: InteractionState,
    shape: ShapeKind,
    elapsed: f32,
    dt: f32,
    cfg: &MorphConfig,
    rng: &mut impl Rng,
) {
    assert_eq!(live.len(), target.len());
    let interaction = interaction.sanitized();

    // Hoisted: the scale only depends on the tick, not the particle.
    let scale = target_scale(shape, interaction.expansion, elapsed, cfg);
    let factor = morph_factor(dt, cfg);

    for (p, &t) in live.iter_mut().zip(target) {
        let goal = t * scale + jitter(interaction.tension, cfg, rng);
        *p = approach(*p, goal, factor);
    }
}

/// Writes the rendered positions (live plus idle float) into `out`.
pub fn render_into(live: &[Vec3], elapsed: f32, cfg: &MorphConfig, out: &mut Vec<Vec3>) {
    out.clear();
    out.extend(
        live.iter()
            .enumerate()
            .map(|(i, &p)| p + float_offset(i, elapsed, cfg)),
    );
}
