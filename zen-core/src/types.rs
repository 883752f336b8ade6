/// Identifier for a particle in a [`crate::engine::MorphEngine`].
///
/// This is an index into both the live and the target buffer. The same
/// index always pairs a live position with a target position, even across
/// shape switches where the targets are resampled from scratch.
pub type ParticleId = usize;
