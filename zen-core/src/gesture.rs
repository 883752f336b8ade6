//! Gesture sources feeding an [`InteractionMailbox`] from their own thread.
//!
//! The renderer never waits on a source. A source runs at its own pace,
//! pushes raw samples through an [`InteractionSender`], and may stop or
//! vanish at any time without disturbing the animation.

use crate::error::SampleParseError;
use crate::interaction::InteractionState;
use crate::mailbox::{InteractionMailbox, InteractionSender};
use std::f32::consts::TAU;
use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Anything that can deliver interaction samples.
pub trait GestureSource: Send + 'static {
    /// Name shown in logs and the status display.
    fn name(&self) -> &str;

    /// Pushes samples into `sink` until exhausted or `stop` is raised.
    fn run(self: Box<Self>, sink: InteractionSender, stop: Arc<AtomicBool>);
}

/// Running gesture source. Dropping the handle asks the source to stop.
#[derive(Debug)]
pub struct GestureHandle {
    name: String,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl GestureHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the source thread has returned.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Asks the source to stop without waiting for it.
    ///
    /// A source blocked on I/O notices on its next wake-up; the mailbox
    /// keeps the last value either way.
    pub fn disconnect(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Waits for the source thread to return.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            log::error!("gesture source `{}` panicked", self.name);
        }
    }
}

impl Drop for GestureHandle {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Spawns `source` on its own thread, wired to `mailbox`.
pub fn spawn_gesture_source<G: GestureSource>(
    source: G,
    mailbox: &InteractionMailbox,
) -> GestureHandle {
    let name = source.name().to_owned();
    let stop = Arc::new(AtomicBool::new(false));
    let sink = mailbox.sender();
    let thread_stop = Arc::clone(&stop);

    log::info!("gesture source `{name}` connected");
    let thread_name = name.clone();
    let thread = thread::spawn(move || {
        Box::new(source).run(sink, thread_stop);
        log::info!("gesture source `{thread_name}` disconnected");
    });

    GestureHandle {
        name,
        stop,
        thread: Some(thread),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// OscillatingGestureSource
// ════════════════════════════════════════════════════════════════════════════

/// Simulated hands: tension and expansion follow slow, out-of-step waves.
///
/// Stands in for a vision service when no camera is available.
#[derive(Clone, Debug)]
pub struct OscillatingGestureSource {
    /// Samples per second.
    pub rate_hz: f32,
    /// Seconds for one full clench-and-release.
    pub tension_period: f32,
    /// Seconds for one full spread-and-close.
    pub expansion_period: f32,
    /// Stop after this many samples.
    pub limit: Option<usize>,
}

impl Default for OscillatingGestureSource {
    fn default() -> Self {
        Self {
            rate_hz: 3.0,
            tension_period: 8.0,
            expansion_period: 13.0,
            limit: None,
        }
    }
}

impl OscillatingGestureSource {
    /// Raw sample at `t` seconds after start. Both waves start at 0.
    pub fn sample_at(&self, t: f32) -> InteractionState {
        let wave = |period: f32| 0.5 - 0.5 * (t * TAU / period.max(f32::EPSILON)).cos();
        InteractionState::new(wave(self.tension_period), wave(self.expansion_period))
    }
}

impl GestureSource for OscillatingGestureSource {
    fn name(&self) -> &str {
        "simulated hands"
    }

    fn run(self: Box<Self>, sink: InteractionSender, stop: Arc<AtomicBool>) {
        let interval = 1.0 / self.rate_hz.max(0.1);
        let mut sent = 0usize;

        while !stop.load(Ordering::Acquire) && self.limit.is_none_or(|limit| sent < limit) {
            sink.push(self.sample_at(sent as f32 * interval));
            sent += 1;
            thread::sleep(Duration::from_secs_f32(interval));
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LineGestureSource
// ════════════════════════════════════════════════════════════════════════════

/// Reads one sample per line from any text stream, e.g. a pipe from an
/// external hand tracker.
///
/// Accepted line forms:
/// - `0.4 0.9` or `0.4, 0.9` — tension then expansion
/// - `tension=0.4 expansion=0.9` — named, any order, missing fields are 0
///
/// Blank lines and lines starting with `#` are ignored. Malformed lines are
/// logged and skipped.
pub struct LineGestureSource<R> {
    name: String,
    reader: R,
}

impl<R: BufRead + Send + 'static> LineGestureSource<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
        }
    }
}

impl<R: BufRead + Send + 'static> GestureSource for LineGestureSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(self: Box<Self>, sink: InteractionSender, stop: Arc<AtomicBool>) {
        let Self { name, reader } = *self;

        for (lineno, line) in reader.lines().enumerate() {
            if stop.load(Ordering::Acquire) {
                return;
            }
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    log::warn!("{name}: read failed: {err}");
                    return;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match parse_sample(trimmed) {
                Ok(sample) => {
                    sink.push(sample);
                }
                Err(err) => log::warn!("{name}:{}: {err}", lineno + 1),
            }
        }
    }
}

/// Parses one textual gesture sample.
pub fn parse_sample(line: &str) -> Result<InteractionState, SampleParseError> {
    let fields: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect();

    if fields.is_empty() {
        return Err(SampleParseError::Empty);
    }

    let number = |s: &str| {
        s.parse::<f32>()
            .map_err(|_| SampleParseError::InvalidNumber(s.to_owned()))
    };

    if fields.iter().any(|f| f.contains('=')) {
        let mut sample = InteractionState::IDLE;
        for field in fields {
            let (key, value) = field
                .split_once('=')
                .ok_or_else(|| SampleParseError::UnknownField(field.to_owned()))?;
            match key.trim().to_ascii_lowercase().as_str() {
                "tension" => sample.tension = number(value)?,
                "expansion" => sample.expansion = number(value)?,
                other => return Err(SampleParseError::UnknownField(other.to_owned())),
            }
        }
        return Ok(sample);
    }

    match fields.as_slice() {
        [tension, expansion] => Ok(InteractionState::new(number(tension)?, number(expansion)?)),
        other => Err(SampleParseError::FieldCount(other.len())),
    }
}
