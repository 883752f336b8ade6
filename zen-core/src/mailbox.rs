//! Single-slot, latest-value-wins hand-off between a gesture source and
//! the animation tick.
//!
//! The sender smooths every sample into the slot as it arrives; the tick
//! only ever copies the current value out. Nothing queues up: a burst of
//! samples between two frames is folded into the slot in arrival order.

use crate::interaction::{InteractionState, smooth};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct Slot {
    state: Mutex<InteractionState>,
    senders: AtomicUsize,
    clamp: bool,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, InteractionState> {
        // A panicking writer can only have left a fully written value behind.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Reading side, held by whoever runs the animation tick.
#[derive(Debug, Clone)]
pub struct InteractionMailbox {
    slot: Arc<Slot>,
}

/// Writing side, handed to a gesture source.
///
/// Dropping the last sender marks the mailbox disconnected; the last
/// smoothed value stays readable.
#[derive(Debug)]
pub struct InteractionSender {
    slot: Arc<Slot>,
}

impl InteractionMailbox {
    /// Creates an idle mailbox. With `clamp` set, smoothed values are
    /// clamped to `[0, 1]` before being stored.
    pub fn new(clamp: bool) -> Self {
        Self {
            slot: Arc::new(Slot {
                state: Mutex::new(InteractionState::IDLE),
                senders: AtomicUsize::new(0),
                clamp,
            }),
        }
    }

    /// Opens a new writing end.
    pub fn sender(&self) -> InteractionSender {
        self.slot.senders.fetch_add(1, Ordering::AcqRel);
        InteractionSender {
            slot: Arc::clone(&self.slot),
        }
    }

    /// Latest smoothed value. Never blocks on a source.
    pub fn latest(&self) -> InteractionState {
        *self.slot.lock()
    }

    /// `true` while at least one sender is alive.
    pub fn is_connected(&self) -> bool {
        self.slot.senders.load(Ordering::Acquire) > 0
    }

    /// Drops the smoothed value back to idle.
    pub fn reset(&self) {
        *self.slot.lock() = InteractionState::IDLE;
    }
}

impl Default for InteractionMailbox {
    fn default() -> Self {
        Self::new(true)
    }
}

impl InteractionSender {
    /// Folds a raw sample into the slot and returns the new smoothed value.
    pub fn push(&self, raw: InteractionState) -> InteractionState {
        let raw = raw.sanitized();
        let mut state = self.slot.lock();
        let mut next = smooth(*state, raw);
        if self.slot.clamp {
            next = next.clamped();
        }
        *state = next;
        next
    }
}

impl Drop for InteractionSender {
    fn drop(&mut self) {
        self.slot.senders.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn starts_idle_and_disconnected() {
        let mailbox = InteractionMailbox::default();
        assert_eq!(mailbox.latest(), InteractionState::IDLE);
        assert!(!mailbox.is_connected());
    }

    #[test]
    fn push_smooths_into_the_slot() {
        let mailbox = InteractionMailbox::new(true);
        let tx = mailbox.sender();

        tx.push(InteractionState::new(1.0, 1.0));
        let s = mailbox.latest();
        assert!((s.tension - 0.3).abs() < 1e-6);
        assert!((s.expansion - 0.3).abs() < 1e-6);

        tx.push(InteractionState::new(1.0, 0.0));
        let s = mailbox.latest();
        assert!((s.tension - 0.51).abs() < 1e-6);
        assert!((s.expansion - 0.21).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_samples_are_clamped_when_enabled() {
        let mailbox = InteractionMailbox::new(true);
        let tx = mailbox.sender();
        for _ in 0..20 {
            tx.push(InteractionState::new(-5.0, 9.0));
        }
        assert_eq!(mailbox.latest(), InteractionState::new(0.0, 1.0));
    }

    #[test]
    fn out_of_range_samples_pass_through_when_clamping_disabled() {
        let mailbox = InteractionMailbox::new(false);
        let tx = mailbox.sender();
        let s = tx.push(InteractionState::new(-10.0, 10.0));
        assert!((s.tension + 3.0).abs() < 1e-5);
        assert!((s.expansion - 3.0).abs() < 1e-5);
    }

    #[test]
    fn non_finite_samples_count_as_zero() {
        let mailbox = InteractionMailbox::new(true);
        let tx = mailbox.sender();
        tx.push(InteractionState::new(1.0, 1.0));
        tx.push(InteractionState::new(f32::NAN, f32::NEG_INFINITY));
        let s = mailbox.latest();
        assert!(s.tension.is_finite() && s.expansion.is_finite());
        assert!((s.tension - 0.21).abs() < 1e-6);
    }

    #[test]
    fn disconnect_keeps_last_value() {
        let mailbox = InteractionMailbox::default();
        let tx = mailbox.sender();
        assert!(mailbox.is_connected());

        let last = tx.push(InteractionState::new(0.5, 0.5));
        drop(tx);

        assert!(!mailbox.is_connected());
        assert_eq!(mailbox.latest(), last);
    }

    #[test]
    fn sender_on_another_thread_is_visible_to_reader() {
        let mailbox = InteractionMailbox::default();
        let tx = mailbox.sender();

        let handle = thread::spawn(move || {
            for _ in 0..10 {
                tx.push(InteractionState::new(1.0, 0.0));
            }
        });
        handle.join().unwrap();

        let s = mailbox.latest();
        assert!(s.tension > 0.95);
        assert_eq!(s.expansion, 0.0);
        assert!(!mailbox.is_connected());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mailbox = InteractionMailbox::default();
        mailbox.sender().push(InteractionState::new(1.0, 1.0));
        mailbox.reset();
        assert_eq!(mailbox.latest(), InteractionState::IDLE);
    }
}
