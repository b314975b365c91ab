//! Timed replay of a Morse sequence against a set of display fields.
//!
//! The driver never sleeps. Every time it needs to wait it hands back a
//! [`Wakeup`]; the host waits `delay` and returns the ticket through
//! [`PlaybackDriver::fire`]. Only the most recently issued ticket is honoured,
//! so callbacks left over from a restarted run are dropped without touching
//! state.

use std::time::Duration;

use tracing::{debug, trace};

use crate::sequence::{build_full_display, build_sequence, Event, WORD_SEPARATOR};
use crate::timing::TimingConfig;

pub const CALIBRATION_DELAY: Duration = Duration::from_millis(1000);
pub const CALIBRATING_TEXT: &str = "CALIBRATING...";
pub const DECODING_TEXT: &str = "DECODING...";

pub const LABEL_CALIBRATING: &str = "Calibrating";
pub const LABEL_LOCKED: &str = "Locked";
pub const LABEL_COMPLETE: &str = "Complete";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Calibrating,
    Playing,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Calibrating => write!(f, "Calibrating"),
            Phase::Playing => write!(f, "Playing"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Everything the driver publishes. Front ends only ever read this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySnapshot {
    pub symbol_stream: String,
    pub decoded: String,
    pub pulse_width: String,
    pub calibration: String,
    pub light_active: bool,
    /// Shown only while calibrating.
    pub banner: Option<String>,
}

impl DisplaySnapshot {
    pub fn calibrating(timing: &TimingConfig) -> Self {
        DisplaySnapshot {
            symbol_stream: CALIBRATING_TEXT.to_string(),
            decoded: CALIBRATING_TEXT.to_string(),
            pulse_width: timing.pulse_width_label(),
            calibration: LABEL_CALIBRATING.to_string(),
            light_active: false,
            banner: Some(CALIBRATING_TEXT.to_string()),
        }
    }

    /// Last `max` characters of the symbol stream, so the newest symbols stay
    /// visible in a fixed-width field.
    pub fn symbol_tail(&self, max: usize) -> &str {
        let stream = self.symbol_stream.as_str();
        let count = stream.chars().count();
        if count <= max {
            return stream;
        }
        let start = stream
            .char_indices()
            .nth(count - max)
            .map_or(stream.len(), |(i, _)| i);
        &stream[start..]
    }
}

/// Identifies one scheduled step of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    generation: u64,
    step: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wakeup {
    pub ticket: Ticket,
    pub delay: Duration,
}

#[derive(Debug, Default)]
struct PlaybackState {
    index: usize,
    decoded: String,
    letter_symbols: String,
    morse_output: String,
}

impl PlaybackState {
    fn stream(&self) -> String {
        format!("{}{}", self.morse_output, self.letter_symbols)
            .trim()
            .to_string()
    }
}

pub struct PlaybackDriver {
    message: String,
    timing: TimingConfig,
    phase: Phase,
    sequence: Vec<Event>,
    full_display: String,
    state: PlaybackState,
    display: DisplaySnapshot,
    generation: u64,
    next_step: u64,
    pending: Option<Ticket>,
}

impl PlaybackDriver {
    /// Creates an idle driver showing the calibration view. Call
    /// [`restart`](Self::restart) to begin.
    pub fn new(message: impl Into<String>, timing: TimingConfig) -> Self {
        let timing = timing.sanitized();
        PlaybackDriver {
            message: message.into(),
            timing,
            phase: Phase::Calibrating,
            sequence: Vec::new(),
            full_display: String::new(),
            state: PlaybackState::default(),
            display: DisplaySnapshot::calibrating(&timing),
            generation: 0,
            next_step: 0,
            pending: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn display(&self) -> &DisplaySnapshot {
        &self.display
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    /// True when `ticket` is the loop-pause wakeup issued at the end of a
    /// pass. Hosts with editable timing restart through
    /// [`restart`](Self::restart) instead of firing it, so the next pass
    /// picks up the current inputs.
    pub fn is_loop_restart(&self, ticket: Ticket) -> bool {
        self.phase == Phase::Complete && self.pending == Some(ticket)
    }

    /// Abandons the current run and re-enters calibration with `timing`.
    pub fn restart(&mut self, timing: TimingConfig) -> Wakeup {
        self.generation += 1;
        self.next_step = 0;
        self.pending = None;
        self.timing = timing.sanitized();
        self.state = PlaybackState::default();
        self.sequence.clear();
        self.full_display.clear();
        self.phase = Phase::Calibrating;
        self.display = DisplaySnapshot::calibrating(&self.timing);
        debug!(generation = self.generation, timing = ?self.timing, "playback restarted");
        self.schedule(CALIBRATION_DELAY)
    }

    /// Replaces the message, then restarts like [`restart`](Self::restart).
    pub fn set_message(&mut self, message: impl Into<String>, timing: TimingConfig) -> Wakeup {
        self.message = message.into();
        self.restart(timing)
    }

    /// Runs the step `ticket` was issued for. Returns the next wakeup, or
    /// `None` if the ticket is stale.
    pub fn fire(&mut self, ticket: Ticket) -> Option<Wakeup> {
        if self.pending != Some(ticket) {
            trace!(?ticket, current = ?self.pending, "ignoring stale ticket");
            return None;
        }
        self.pending = None;

        let next = match self.phase {
            Phase::Calibrating => {
                self.lock();
                self.advance()
            }
            Phase::Playing => self.advance(),
            Phase::Complete => self.restart(self.timing),
        };
        Some(next)
    }

    fn schedule(&mut self, delay: Duration) -> Wakeup {
        let ticket = Ticket {
            generation: self.generation,
            step: self.next_step,
        };
        self.next_step += 1;
        self.pending = Some(ticket);
        Wakeup { ticket, delay }
    }

    fn lock(&mut self) {
        self.sequence = build_sequence(&self.message, &self.timing);
        self.full_display = build_full_display(&self.message);
        self.state = PlaybackState::default();
        self.phase = Phase::Playing;
        self.display.banner = None;
        self.display.calibration = LABEL_LOCKED.to_string();
        debug!(events = self.sequence.len(), "signal locked");
    }

    fn advance(&mut self) -> Wakeup {
        // Letter and word markers are consumed in place so the next pulse
        // lights up in the same turn.
        loop {
            let Some(event) = self.sequence.get(self.state.index).cloned() else {
                return self.complete();
            };
            self.state.index += 1;

            match event {
                Event::Pulse {
                    duration, symbol, ..
                } => {
                    self.state.letter_symbols.push(symbol);
                    self.display.symbol_stream = self.state.stream();
                    self.display.decoded = if self.state.decoded.is_empty() {
                        DECODING_TEXT.to_string()
                    } else {
                        self.state.decoded.clone()
                    };
                    self.display.calibration = LABEL_LOCKED.to_string();
                    self.display.pulse_width = self.timing.pulse_width_label();
                    self.display.light_active = true;
                    return self.schedule(Duration::from_millis(duration));
                }
                Event::Gap { duration } => {
                    self.display.light_active = false;
                    let stream = self.state.stream();
                    self.display.symbol_stream = if stream.is_empty() {
                        self.full_display.clone()
                    } else {
                        stream
                    };
                    return self.schedule(Duration::from_millis(duration));
                }
                Event::LetterComplete { letter } => {
                    self.state.decoded.push(letter);
                    let symbols = std::mem::take(&mut self.state.letter_symbols);
                    self.state.morse_output.push_str(&symbols);
                    self.state.morse_output.push(' ');
                    self.display.decoded = self.state.decoded.clone();
                    self.display.symbol_stream = self.state.stream();
                }
                Event::WordBreak => {
                    self.state.decoded.push(' ');
                    self.state.morse_output.push_str(WORD_SEPARATOR);
                    self.state.morse_output.push(' ');
                    self.display.decoded = self.state.decoded.clone();
                    self.display.symbol_stream = self.state.stream();
                }
            }
        }
    }

    fn complete(&mut self) -> Wakeup {
        self.display.symbol_stream = self.full_display.clone();
        self.display.decoded = self.message.clone();
        self.display.light_active = false;
        self.display.calibration = LABEL_COMPLETE.to_string();
        self.phase = Phase::Complete;
        debug!(generation = self.generation, "playback complete");
        self.schedule(self.timing.loop_pause())
    }
}
