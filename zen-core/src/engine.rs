//! [`MorphEngine`]: owner of the live particle buffer.
//!
//! The engine pairs a live buffer with a target buffer of the same length
//! and eases one toward the other every tick. Switching shape replaces the
//! target wholesale; the live buffer is never reset, so the cloud glides
//! from wherever it is toward the new shape.

use crate::{
    config::MorphConfig,
    error::EngineError,
    frame::FrameBuffer,
    generator,
    interaction::InteractionState,
    morph,
    shape::ShapeKind,
};
use glam::Vec3;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct MorphEngine {
    live: Vec<Vec3>,
    target: Vec<Vec3>,
    shape: ShapeKind,
    elapsed: f64,
    cfg: MorphConfig,
    frame: FrameBuffer,
}

impl MorphEngine {
    /// Creates an engine of `cfg.particle_count` particles aimed at `shape`.
    ///
    /// Every particle starts at the origin and blooms out on the first ticks.
    ///
    /// ### Errors
    /// [`EngineError::EmptyBuffer`] if `cfg.particle_count` is zero.
    pub fn new(shape: ShapeKind, cfg: MorphConfig, rng: &mut impl Rng) -> Result<Self, EngineError> {
        let count = cfg.particle_count;
        if count == 0 {
            return Err(EngineError::EmptyBuffer);
        }
        let target = generator::generate(shape, count, rng);
        Self::from_buffers(vec![Vec3::ZERO; count], target, shape, cfg)
    }

    /// Creates an engine from explicit buffers.
    ///
    /// `cfg.particle_count` is overwritten with the buffer length.
    ///
    /// ### Errors
    /// - [`EngineError::EmptyBuffer`] if `live` is empty.
    /// - [`EngineError::LengthMismatch`] if `target` differs in length from `live`.
    pub fn from_buffers(
        live: Vec<Vec3>,
        target: Vec<Vec3>,
        shape: ShapeKind,
        mut cfg: MorphConfig,
    ) -> Result<Self, EngineError> {
        if live.is_empty() {
            return Err(EngineError::EmptyBuffer);
        }
        check_len(live.len(), &target)?;
        cfg.particle_count = live.len();

        let mut engine = Self {
            frame: FrameBuffer::with_len(live.len()),
            live,
            target,
            shape,
            elapsed: 0.0,
            cfg,
        };
        engine.render();
        Ok(engine)
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    /// Session clock in seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    #[inline]
    pub fn live(&self) -> &[Vec3] {
        &self.live
    }

    #[inline]
    pub fn target(&self) -> &[Vec3] {
        &self.target
    }

    #[inline]
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    #[inline]
    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    #[inline]
    pub fn config(&self) -> &MorphConfig {
        &self.cfg
    }

    /// Replaces the integrator constants. The particle count is fixed for
    /// the engine's lifetime and is kept as is.
    pub fn set_config(&mut self, cfg: MorphConfig) {
        self.cfg = MorphConfig {
            particle_count: self.live.len(),
            ..cfg
        };
    }

    /// Aims the cloud at a freshly generated `shape`.
    ///
    /// Does nothing if `shape` is already selected. Returns whether the
    /// target buffer was replaced.
    pub fn set_shape(&mut self, shape: ShapeKind, rng: &mut impl Rng) -> bool {
        if shape == self.shape {
            return false;
        }
        log::debug!("morphing {} -> {}", self.shape, shape);
        self.target = generator::generate(shape, self.live.len(), rng);
        self.shape = shape;
        true
    }

    /// Replaces the target buffer with externally produced positions.
    ///
    /// ### Errors
    /// [`EngineError::LengthMismatch`] if `target` has the wrong length; the
    /// current target is kept.
    pub fn replace_target(
        &mut self,
        shape: ShapeKind,
        target: Vec<Vec3>,
    ) -> Result<(), EngineError> {
        check_len(self.live.len(), &target)?;
        self.target = target;
        self.shape = shape;
        Ok(())
    }

    /// Runs one animation tick of `dt` seconds.
    ///
    /// Never blocks and never fails. Negative or non-finite `dt` is
    /// treated as a zero-length tick, and non-finite interaction values
    /// as idle, so one bad sample cannot poison the live buffer.
    pub fn tick(&mut self, interaction: InteractionState, dt: f32, rng: &mut impl Rng) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let interaction = interaction.sanitized();
        let interaction = InteractionState {
            tension: interaction.tension.max(0.0),
            ..interaction
        };
        self.elapsed += f64::from(dt);
        let elapsed = self.elapsed as f32;

        morph::advance(
            &mut self.live,
            &self.target,
            interaction,
            self.shape,
            elapsed,
            dt,
            &self.cfg,
            rng,
        );
        self.frame
            .rotate_by(morph::spin_step(interaction.tension, dt, &self.cfg));
        self.render();
    }

    fn render(&mut self) {
        let elapsed = self.elapsed as f32;
        morph::render_into(&self.live, elapsed, &self.cfg, self.frame.positions_mut());
        self.frame.mark_dirty();
    }
}

fn check_len(expected: usize, target: &[Vec3]) -> Result<(), EngineError> {
    if target.len() == expected {
        Ok(())
    } else {
        Err(EngineError::LengthMismatch {
            expected,
            found: target.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    const DT: f32 = 1.0 / 60.0;

    fn small_cfg(count: usize) -> MorphConfig {
        MorphConfig {
            particle_count: count,
            ..MorphConfig::default()
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn new_starts_at_origin_with_generated_target() {
        let engine = MorphEngine::new(ShapeKind::Heart, small_cfg(200), &mut rng()).unwrap();
        assert_eq!(engine.particle_count(), 200);
        assert_eq!(engine.target().len(), 200);
        assert!(engine.live().iter().all(|p| *p == Vec3::ZERO));
        assert_eq!(engine.shape(), ShapeKind::Heart);
        assert_eq!(engine.frame().positions().len(), 200);
    }

    #[test]
    fn zero_particles_is_rejected_up_front() {
        let err = MorphEngine::new(ShapeKind::Sphere, small_cfg(0), &mut rng()).unwrap_err();
        assert_eq!(err, EngineError::EmptyBuffer);
    }

    #[test]
    fn mismatched_buffers_are_rejected_up_front() {
        let err = MorphEngine::from_buffers(
            vec![Vec3::ZERO; 3],
            vec![Vec3::ONE; 4],
            ShapeKind::Sphere,
            MorphConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::LengthMismatch {
                expected: 3,
                found: 4
            }
        );
    }

    #[test]
    fn from_buffers_pins_particle_count() {
        let engine = MorphEngine::from_buffers(
            vec![Vec3::ZERO; 5],
            vec![Vec3::ONE; 5],
            ShapeKind::Sphere,
            small_cfg(999),
        )
        .unwrap();
        assert_eq!(engine.config().particle_count, 5);
    }

    #[test]
    fn set_config_keeps_particle_count() {
        let mut engine = MorphEngine::new(ShapeKind::Sphere, small_cfg(10), &mut rng()).unwrap();
        engine.set_config(MorphConfig {
            morph_rate: 6.0,
            ..MorphConfig::default()
        });
        assert_eq!(engine.config().particle_count, 10);
        assert_eq!(engine.config().morph_rate, 6.0);
    }

    #[test]
    fn replace_target_rejects_wrong_length_and_keeps_old_target() {
        let mut engine = MorphEngine::new(ShapeKind::Sphere, small_cfg(8), &mut rng()).unwrap();
        let before = engine.target().to_vec();
        let err = engine
            .replace_target(ShapeKind::Heart, vec![Vec3::ZERO; 7])
            .unwrap_err();
        assert!(matches!(err, EngineError::LengthMismatch { expected: 8, found: 7 }));
        assert_eq!(engine.target(), before.as_slice());
        assert_eq!(engine.shape(), ShapeKind::Sphere);
    }

    #[test]
    fn tick_advances_clock_spin_and_frame() {
        let mut rng = rng();
        let mut engine = MorphEngine::new(ShapeKind::Sphere, small_cfg(50), &mut rng).unwrap();
        engine.frame_mut().mark_uploaded();

        engine.tick(InteractionState::IDLE, DT, &mut rng);

        assert!((engine.elapsed() - DT).abs() < 1e-7);
        assert!((engine.frame().rotation_y() - DT * 0.1).abs() < 1e-7);
        assert!(engine.frame().needs_upload());
        for (i, (&rendered, &live)) in engine
            .frame()
            .positions()
            .iter()
            .zip(engine.live())
            .enumerate()
        {
            let float = morph::float_offset(i, engine.elapsed(), engine.config());
            assert!((rendered - (live + float)).length() < 1e-6);
        }
    }

    #[test]
    fn bad_dt_is_a_zero_length_tick() {
        let mut rng = rng();
        let mut engine = MorphEngine::new(ShapeKind::Sphere, small_cfg(4), &mut rng).unwrap();
        for dt in [f32::NAN, -1.0, f32::INFINITY] {
            engine.tick(InteractionState::IDLE, dt, &mut rng);
        }
        assert_eq!(engine.elapsed(), 0.0);
        assert!(engine.live().iter().all(|p| *p == Vec3::ZERO));
    }

    #[test]
    fn set_shape_only_regenerates_on_change() {
        let mut rng = rng();
        let mut engine = MorphEngine::new(ShapeKind::Saturn, small_cfg(32), &mut rng).unwrap();
        let before = engine.target().to_vec();

        assert!(!engine.set_shape(ShapeKind::Saturn, &mut rng));
        assert_eq!(engine.target(), before.as_slice());

        assert!(engine.set_shape(ShapeKind::Flower, &mut rng));
        assert_eq!(engine.shape(), ShapeKind::Flower);
        assert_ne!(engine.target(), before.as_slice());
        assert_eq!(engine.target().len(), 32);
    }

    #[test]
    fn shape_switch_re_aims_without_resetting_live_buffer() {
        let mut rng = rng();
        let mut engine = MorphEngine::new(ShapeKind::Heart, small_cfg(300), &mut rng).unwrap();
        for _ in 0..30 {
            engine.tick(InteractionState::IDLE, DT, &mut rng);
        }

        let before = engine.live().to_vec();
        engine.set_shape(ShapeKind::Meditator, &mut rng);
        assert_eq!(engine.live(), before.as_slice(), "switch must not touch live");

        engine.tick(InteractionState::IDLE, DT, &mut rng);

        let factor = morph::morph_factor(DT, engine.config());
        for ((&after, &prev), &goal) in engine.live().iter().zip(&before).zip(engine.target()) {
            let step = (after - prev).length();
            let max_step = (goal - prev).length() * factor;
            assert!(step <= max_step + 1e-5, "jumped {step} > {max_step}");
        }
    }

    #[test]
    fn long_idle_run_settles_on_target() {
        let mut rng = rng();
        let mut engine = MorphEngine::new(ShapeKind::Meditator, small_cfg(100), &mut rng).unwrap();
        for _ in 0..600 {
            engine.tick(InteractionState::IDLE, DT, &mut rng);
        }
        for (&live, &target) in engine.live().iter().zip(engine.target()) {
            assert!((live - target).length() < 1e-3);
        }
    }

    #[test]
    fn full_expansion_settles_at_triple_scale() {
        let mut rng = rng();
        let mut engine = MorphEngine::new(ShapeKind::Heart, small_cfg(64), &mut rng).unwrap();
        let spread = InteractionState::new(0.0, 1.0);
        for _ in 0..600 {
            engine.tick(spread, DT, &mut rng);
        }
        for (&live, &target) in engine.live().iter().zip(engine.target()) {
            assert!((live - target * 3.0).length() < 1e-3);
        }
    }

    #[test]
    fn out_of_range_interaction_never_produces_nan() {
        let mut rng = rng();
        let mut engine = MorphEngine::new(ShapeKind::Fireworks, small_cfg(64), &mut rng).unwrap();
        for wild in [
            InteractionState::new(-4.0, -4.0),
            InteractionState::new(25.0, 25.0),
            InteractionState::new(1.0, -0.5),
            InteractionState::new(f32::NAN, f32::NAN),
            InteractionState::new(f32::INFINITY, f32::NEG_INFINITY),
            InteractionState::new(f32::NEG_INFINITY, f32::INFINITY),
            InteractionState::new(0.5, f32::NAN),
        ] {
            for _ in 0..30 {
                engine.tick(wild, DT, &mut rng);
            }
        }
        assert!(engine.live().iter().all(|p| p.is_finite()));
        assert!(engine.frame().positions().iter().all(|p| p.is_finite()));
        assert!(engine.frame().rotation_y().is_finite());
    }

    #[test]
    fn single_nan_sample_does_not_poison_the_cloud() {
        let mut rng = rng();
        let mut engine = MorphEngine::new(ShapeKind::Sphere, small_cfg(8), &mut rng).unwrap();
        engine.tick(InteractionState::new(0.5, f32::NAN), DT, &mut rng);
        assert!(engine.live().iter().all(|p| p.is_finite()));

        for _ in 0..600 {
            engine.tick(InteractionState::IDLE, DT, &mut rng);
        }
        for (p, t) in engine.live().iter().zip(engine.target()) {
            assert!(p.is_finite());
            assert!(p.distance(*t) < 1e-3, "{p} did not settle on {t}");
        }
        assert!(engine.frame().positions().iter().all(|p| p.is_finite()));
    }
}
