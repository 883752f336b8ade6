//! Gesture-driven interaction parameters.
//!
//! Samples arrive a few times per second from an untrusted source. Each
//! arriving sample is blended into the running value with [`smooth`], so
//! the integrator never sees the raw estimate snap from one value to the
//! next.

/// Weight kept from the previous smoothed value on each new sample.
pub const SMOOTHING_RETAIN: f32 = 0.7;

/// Hand tension and spread, nominally in `[0, 1]`.
///
/// - `tension` drives jitter amplitude and spin speed.
/// - `expansion` drives how far the target shape is scaled out.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub tension: f32,
    pub expansion: f32,
}

impl InteractionState {
    /// The resting state: open hands held together.
    pub const IDLE: Self = Self {
        tension: 0.0,
        expansion: 0.0,
    };

    pub fn new(tension: f32, expansion: f32) -> Self {
        Self { tension, expansion }
    }

    /// Replaces NaN and infinite components with `0`.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let finite_or_zero = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self {
            tension: finite_or_zero(self.tension),
            expansion: finite_or_zero(self.expansion),
        }
    }

    /// Clamps both components to `[0, 1]`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            tension: self.tension.clamp(0.0, 1.0),
            expansion: self.expansion.clamp(0.0, 1.0),
        }
    }
}

/// Blends a newly arrived raw sample into the previous smoothed state.
///
/// `next = 0.7 * previous + 0.3 * raw`, componentwise. Runs once per
/// arriving sample, not once per frame.
#[must_use]
pub fn smooth(previous: InteractionState, raw: InteractionState) -> InteractionState {
    let blend = |prev: f32, raw: f32| SMOOTHING_RETAIN * prev + (1.0 - SMOOTHING_RETAIN) * raw;
    InteractionState {
        tension: blend(previous.tension, raw.tension),
        expansion: blend(previous.expansion, raw.expansion),
    }
}
