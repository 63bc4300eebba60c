use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Générations par seconde sur une fenêtre glissante d'échantillons.
///
/// Each sample is `(instant, step counter)`; the rate is the step delta over
/// the time delta between the oldest and newest sample in the window.
///
/// # Example
/// ```
/// use std::time::{Duration, Instant};
/// use ca_render::rate::GenerationRate;
/// let mut rate = GenerationRate::new(8);
/// let t0 = Instant::now();
/// rate.observe(t0, 0);
/// rate.observe(t0 + Duration::from_millis(500), 10);
/// assert!((rate.per_second() - 20.0).abs() < 1e-9);
/// ```
pub struct GenerationRate {
    samples: VecDeque<(Instant, u64)>,
    window: usize,
    per_second: f64,
}

impl GenerationRate {
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(2);
        Self {
            samples: VecDeque::with_capacity(window + 1),
            window,
            per_second: 0.0,
        }
    }

    /// Record the step counter at `now`. Call once per drawn frame.
    pub fn observe(&mut self, now: Instant, steps: u64) {
        self.samples.push_back((now, steps));
        if self.samples.len() > self.window {
            self.samples.pop_front();
        }
        if let (Some(&(t0, s0)), Some(&(t1, s1))) = (self.samples.front(), self.samples.back()) {
            let secs = t1.saturating_duration_since(t0).as_secs_f64();
            if secs > 0.0 {
                self.per_second = s1.saturating_sub(s0) as f64 / secs;
            }
        }
    }

    /// Forget every sample (after a pause, so the idle time is not averaged in).
    pub fn reset(&mut self) {
        self.samples.clear();
        self.per_second = 0.0;
    }

    #[must_use]
    pub fn per_second(&self) -> f64 {
        self.per_second
    }

    /// Rate a delay alone would give, for comparison in the sidebar.
    #[must_use]
    pub fn nominal(delay: Duration, steps_per_frame: u64) -> f64 {
        let secs = delay.as_secs_f64();
        if secs > 0.0 {
            steps_per_frame as f64 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let mut rate = GenerationRate::new(4);
        assert!(rate.per_second().abs() < f64::EPSILON);
        rate.observe(Instant::now(), 5);
        assert!(rate.per_second().abs() < f64::EPSILON);
    }

    #[test]
    fn window_drops_old_samples() {
        let mut rate = GenerationRate::new(3);
        let t0 = Instant::now();
        rate.observe(t0, 0);
        rate.observe(t0 + Duration::from_secs(1), 1);
        rate.observe(t0 + Duration::from_secs(2), 2);
        rate.observe(t0 + Duration::from_secs(3), 12);
        // Fenêtre : (1 s, 1) → (3 s, 12).
        assert!((rate.per_second() - 5.5).abs() < 1e-9);
    }

    #[test]
    fn reset_clears_history() {
        let mut rate = GenerationRate::new(3);
        let t0 = Instant::now();
        rate.observe(t0, 0);
        rate.observe(t0 + Duration::from_millis(100), 2);
        rate.reset();
        assert!(rate.per_second().abs() < f64::EPSILON);
    }

    #[test]
    fn nominal_rate_from_delay() {
        assert!((GenerationRate::nominal(Duration::from_millis(50), 2) - 40.0).abs() < 1e-9);
        assert!(GenerationRate::nominal(Duration::ZERO, 2).abs() < f64::EPSILON);
    }
}
