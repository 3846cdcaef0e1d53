//! Wall-clock driven animation phase.

use std::num::NonZeroU64;
use std::time::Instant;

/// Default length of one animation cycle.
pub const MS_PER_CYCLE: NonZeroU64 = match NonZeroU64::new(10_000) {
    Some(v) => v,
    None => unreachable!(),
};

/// Largest f32 strictly below 1.0.
const BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

/// Fraction of the current cycle that has elapsed, in `[0, 1)`.
///
/// The division is done in f64; the f32 result is clamped so that rounding
/// of very long cycles can never produce exactly 1.0.
pub fn phase(elapsed_ms: u64, cycle_ms: NonZeroU64) -> f32 {
    let cycle = cycle_ms.get();
    let within = elapsed_ms % cycle;
    ((within as f64 / cycle as f64) as f32).min(BELOW_ONE)
}

/// Monotonic start point for the animation.
#[derive(Debug, Clone, Copy)]
pub struct AnimationClock {
    start: Instant,
    cycle_ms: NonZeroU64,
}

impl AnimationClock {
    pub fn new(cycle_ms: NonZeroU64) -> Self {
        Self {
            start: Instant::now(),
            cycle_ms,
        }
    }

    pub fn cycle_ms(&self) -> NonZeroU64 {
        self.cycle_ms
    }

    /// Milliseconds since the clock was created.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Current animation phase.
    pub fn phase(&self) -> f32 {
        phase(self.elapsed_ms(), self.cycle_ms)
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(MS_PER_CYCLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(ms: u64) -> NonZeroU64 {
        NonZeroU64::new(ms).unwrap()
    }

    #[test]
    fn test_phase_quarter_cycle() {
        assert!((phase(2_500, MS_PER_CYCLE) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_phase_wraps_at_multiples_of_cycle() {
        for k in 0..5u64 {
            assert_eq!(phase(k * 10_000, MS_PER_CYCLE), 0.0);
        }
        assert_eq!(phase(u64::MAX - u64::MAX % 7, cycle(7)), 0.0);
    }

    #[test]
    fn test_phase_always_in_unit_range() {
        let cycles = [1, 3, 1_000, 10_000, 16_777_217, u64::MAX];
        let samples = [0, 1, 999, 9_999, 10_001, 16_777_216, u64::MAX - 1, u64::MAX];
        for c in cycles {
            for e in samples {
                let p = phase(e, cycle(c));
                assert!((0.0..1.0).contains(&p), "phase({e}, {c}) = {p}");
            }
        }
    }

    #[test]
    fn test_phase_monotonic_within_cycle() {
        let mut last = -1.0;
        for ms in (0..10_000).step_by(37) {
            let p = phase(ms, MS_PER_CYCLE);
            assert!(p > last);
            last = p;
        }
    }

    #[test]
    fn test_last_millisecond_stays_below_one() {
        assert!(phase(9_999, MS_PER_CYCLE) < 1.0);
        assert!(phase(u64::MAX - 1, cycle(u64::MAX)) < 1.0);
    }

    #[test]
    fn test_clock_starts_near_zero() {
        let clock = AnimationClock::new(cycle(1_000_000));
        assert!(clock.phase() < 0.01);
        assert_eq!(clock.cycle_ms().get(), 1_000_000);
    }
}
