//! Periodic morph clock.
//!
//! One loop disperses the asset and reassembles it: the first half of the
//! loop ramps `morph` from 0 to 1, the second half brings it back to 0.
//! The triangle wave is shaped with a cubic ease-in-out so both ends of
//! the pulse start and stop with zero velocity.

use crate::util::easing::ease_in_out_cubic;

/// Per-tick morph state, computed once and shared by every consumer in the
/// same tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphState {
    /// Seconds since the clock was last reset.
    pub elapsed_seconds: f32,
    /// Position within the loop, in `[0, 1)`.
    pub phase: f32,
    /// `true` during the first half of the loop.
    pub dispersing: bool,
    /// Eased triangle wave in `[0, 1]`.
    pub morph: f32,
}

impl MorphState {
    /// The state of an idle clock (mode none).
    pub const IDLE: MorphState = MorphState {
        elapsed_seconds: 0.0,
        phase: 0.0,
        dispersing: true,
        morph: 0.0,
    };

    /// Whether the loop is in its reassembling half.
    #[must_use]
    pub fn reassembling(&self) -> bool {
        !self.dispersing
    }
}

/// Fixed-length loop clock producing [`MorphState`] from time.
#[derive(Debug, Clone)]
pub struct MorphClock {
    loop_seconds: f32,
    start_time: f64,
}

impl MorphClock {
    /// Clock with the given loop length, started at `now`.
    ///
    /// Non-positive or non-finite loop lengths fall back to 3.2 s.
    pub fn new(loop_seconds: f32, now: f64) -> Self {
        let loop_seconds = if loop_seconds.is_finite() && loop_seconds > 0.0 {
            loop_seconds
        } else {
            3.2
        };
        Self {
            loop_seconds,
            start_time: now,
        }
    }

    /// Loop length in seconds.
    pub fn loop_seconds(&self) -> f32 {
        self.loop_seconds
    }

    /// Restart the loop at `now` (mode changes and asset loads).
    pub fn reset(&mut self, now: f64) {
        self.start_time = now;
    }

    /// Sample the clock at `now`. Times before the start clamp to zero.
    #[must_use]
    pub fn sample(&self, now: f64) -> MorphState {
        let elapsed = (now - self.start_time).max(0.0);
        Self::state_at(elapsed, self.loop_seconds)
    }

    /// Morph state `elapsed` seconds into a loop of `loop_seconds`.
    #[must_use]
    pub fn state_at(elapsed: f64, loop_seconds: f32) -> MorphState {
        let period = f64::from(loop_seconds);
        let phase = ((elapsed.rem_euclid(period)) / period) as f32;
        // rem_euclid can land exactly on the period through rounding
        let phase = if phase >= 1.0 { 0.0 } else { phase };
        let dispersing = phase < 0.5;
        let triangle = if dispersing {
            phase * 2.0
        } else {
            (1.0 - phase) * 2.0
        };
        MorphState {
            elapsed_seconds: elapsed as f32,
            phase,
            dispersing,
            morph: ease_in_out_cubic(triangle).clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn morph_starts_at_zero_and_peaks_mid_loop() {
        let clock = MorphClock::new(3.2, 0.0);
        assert_eq!(clock.sample(0.0).morph, 0.0);
        let mid = clock.sample(1.6);
        assert!((mid.morph - 1.0).abs() < 1e-4, "peak was {}", mid.morph);
        assert!(!mid.dispersing);
    }

    #[test]
    fn morph_is_periodic_and_bounded() {
        let clock = MorphClock::new(3.2, 0.0);
        let mut t = 0.0;
        while t < 10.0 {
            let a = clock.sample(t);
            let b = clock.sample(t + 3.2);
            assert!((0.0..=1.0).contains(&a.morph));
            assert!((a.morph - b.morph).abs() < 1e-3, "t={t}");
            t += 0.037;
        }
    }

    #[test]
    fn dispersing_covers_first_half() {
        let clock = MorphClock::new(3.2, 0.0);
        assert!(clock.sample(0.5).dispersing);
        assert!(clock.sample(1.5).dispersing);
        assert!(clock.sample(1.7).reassembling());
        assert!(clock.sample(3.1).reassembling());
    }

    #[test]
    fn reset_restarts_the_loop() {
        let mut clock = MorphClock::new(3.2, 0.0);
        assert!(clock.sample(1.0).morph > 0.1);
        clock.reset(1.0);
        assert_eq!(clock.sample(1.0).morph, 0.0);
        // before the start time clamps to the start
        assert_eq!(clock.sample(0.5).morph, 0.0);
    }

    #[test]
    fn bad_loop_length_falls_back() {
        assert_eq!(MorphClock::new(0.0, 0.0).loop_seconds(), 3.2);
        assert_eq!(MorphClock::new(f32::NAN, 0.0).loop_seconds(), 3.2);
    }
}
