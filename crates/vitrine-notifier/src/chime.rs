//! The two-tone notification chime.
//!
//! [`Chime`] describes the sound as data (tones plus a gain envelope) so any
//! audio backend can render it. Playback goes through [`ChimePlayer`];
//! callers ignore playback failures.

use std::io::Write;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChimeError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("audio output failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A sine tone active over `[start, stop)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f64,
    pub start: Duration,
    pub stop: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chime {
    pub tones: [Tone; 2],
    pub peak_gain: f64,
    /// Linear ramp from silence to `peak_gain`.
    pub attack: Duration,
    /// Exponential decay reaches `floor_gain` at this offset.
    pub release_end: Duration,
    pub floor_gain: f64,
}

impl Chime {
    /// 1200 Hz then 900 Hz.
    pub const OFFER: Chime = Chime {
        tones: [
            Tone {
                frequency_hz: 1200.0,
                start: Duration::from_millis(0),
                stop: Duration::from_millis(200),
            },
            Tone {
                frequency_hz: 900.0,
                start: Duration::from_millis(220),
                stop: Duration::from_millis(520),
            },
        ],
        peak_gain: 0.18,
        attack: Duration::from_millis(20),
        release_end: Duration::from_millis(500),
        floor_gain: 0.0001,
    };

    /// Total length of the sound.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.tones
            .iter()
            .map(|t| t.stop)
            .max()
            .unwrap_or_default()
    }

    /// Frequency sounding at offset `at`, if any.
    #[must_use]
    pub fn frequency_at(&self, at: Duration) -> Option<f64> {
        self.tones
            .iter()
            .find(|t| t.start <= at && at < t.stop)
            .map(|t| t.frequency_hz)
    }

    /// Envelope gain at offset `at`.
    #[must_use]
    pub fn gain_at(&self, at: Duration) -> f64 {
        if at <= self.attack {
            if self.attack.is_zero() {
                return self.peak_gain;
            }
            return self.peak_gain * at.as_secs_f64() / self.attack.as_secs_f64();
        }
        if at >= self.release_end {
            return self.floor_gain;
        }
        let span = (self.release_end - self.attack).as_secs_f64();
        let progress = (at - self.attack).as_secs_f64() / span;
        self.peak_gain * (self.floor_gain / self.peak_gain).powf(progress)
    }
}

pub trait ChimePlayer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ChimeError`] if the sound could not be played.
    fn play(&self, chime: &Chime) -> Result<(), ChimeError>;
}

/// Plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentChime;

impl ChimePlayer for SilentChime {
    fn play(&self, _chime: &Chime) -> Result<(), ChimeError> {
        Ok(())
    }
}

/// Rings the terminal bell once per tone.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl ChimePlayer for TerminalBell {
    fn play(&self, chime: &Chime) -> Result<(), ChimeError> {
        let mut stderr = std::io::stderr().lock();
        for _ in &chime.tones {
            stderr.write_all(b"\x07")?;
        }
        stderr.flush()?;
        Ok(())
    }
}
