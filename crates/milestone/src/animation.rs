//! Time curves for the boundary decorations.
//!
//! Everything here is a pure function of elapsed time so hosts can sample the
//! animations from whatever frame clock they have.

use std::collections::VecDeque;
use std::f64::consts::TAU;
use std::time::Duration;

/// Time between two ripple pulses.
pub const RIPPLE_INTERVAL: Duration = Duration::from_millis(1500);
/// Lifetime of one pulse. Longer than the interval, so pulses overlap.
pub const RIPPLE_DURATION: Duration = Duration::from_millis(2000);
pub const RIPPLE_MAX_SCALE: f64 = 1.5;
pub const RIPPLE_LINE_WIDTH: f64 = 0.5;

/// One full spinner revolution.
pub const SPINNER_PERIOD: Duration = Duration::from_millis(1500);
pub const SPINNER_START_ANGLE: f64 = 0.8 * TAU;
pub const SPINNER_SWEEP: f64 = 0.9 * TAU;
pub const SPINNER_LINE_WIDTH: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// Cubic bezier (0, 0, 0.58, 1).
    EaseOut,
}

impl Easing {
    /// Maps normalized time in `[0, 1]` to normalized progress.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOut => cubic_bezier_sample(t, 0.0, 0.0, 0.58, 1.0),
        }
    }
}

fn cubic_bezier_sample(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    // Newton-Raphson for the curve parameter whose x equals t.
    let mut guess = t;
    for _ in 0..8 {
        let x = cubic_bezier_value(guess, x1, x2) - t;
        if x.abs() < 1e-6 {
            break;
        }
        let dx = cubic_bezier_derivative(guess, x1, x2);
        if dx.abs() < 1e-6 {
            break;
        }
        guess -= x / dx;
    }
    cubic_bezier_value(guess.clamp(0.0, 1.0), y1, y2)
}

fn cubic_bezier_value(t: f64, p1: f64, p2: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

fn cubic_bezier_derivative(t: f64, p1: f64, p2: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// Appearance of a single pulse at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseFrame {
    /// Radius multiplier, 1.0 at birth.
    pub scale: f64,
    pub opacity: f64,
}

/// Samples a pulse `age` after it was emitted; `None` once it has faded out.
pub fn pulse_frame(age: Duration) -> Option<PulseFrame> {
    if age >= RIPPLE_DURATION {
        return None;
    }
    let progress = Easing::EaseOut.apply(age.as_secs_f64() / RIPPLE_DURATION.as_secs_f64());
    Some(PulseFrame {
        scale: 1.0 + (RIPPLE_MAX_SCALE - 1.0) * progress,
        opacity: 1.0 - progress,
    })
}

/// Live ripple pulses, oldest first. Pulses are never cancelled, only
/// pruned once they have faded.
#[derive(Debug, Clone, Default)]
pub struct PulseTrain {
    births: VecDeque<Duration>,
}

impl PulseTrain {
    pub fn emit(&mut self, now: Duration) {
        self.births.push_back(now);
    }

    pub fn prune(&mut self, now: Duration) {
        while self
            .births
            .front()
            .is_some_and(|&born| now.saturating_sub(born) >= RIPPLE_DURATION)
        {
            self.births.pop_front();
        }
    }

    pub fn frames(&self, now: Duration) -> impl Iterator<Item = PulseFrame> + '_ {
        self.births
            .iter()
            .filter_map(move |&born| pulse_frame(now.saturating_sub(born)))
    }

    pub fn len(&self) -> usize {
        self.births.len()
    }

    pub fn is_empty(&self) -> bool {
        self.births.is_empty()
    }

    pub fn clear(&mut self) {
        self.births.clear();
    }
}

/// Rotation of the spinner after `elapsed`, in `[0, TAU)`.
pub fn spinner_rotation(elapsed: Duration) -> f64 {
    let period = SPINNER_PERIOD.as_secs_f64();
    let phase = (elapsed.as_secs_f64() % period) / period;
    Easing::Linear.apply(phase) * TAU
}

/// Start and end angles of the spinner arc after `elapsed`.
pub fn spinner_arc(elapsed: Duration) -> (f64, f64) {
    let start = SPINNER_START_ANGLE + spinner_rotation(elapsed);
    (start, start + SPINNER_SWEEP)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_ease_out_endpoints_and_shape() {
        assert!(approx(Easing::EaseOut.apply(0.0), 0.0));
        assert!(approx(Easing::EaseOut.apply(1.0), 1.0));
        // decelerating: ahead of linear in the middle
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert!(Easing::EaseOut.apply(0.25) < Easing::EaseOut.apply(0.5));
    }

    #[test]
    fn test_pulse_grows_and_fades() {
        let birth = pulse_frame(Duration::ZERO).unwrap();
        assert!(approx(birth.scale, 1.0));
        assert!(approx(birth.opacity, 1.0));

        let late = pulse_frame(Duration::from_millis(1999)).unwrap();
        assert!(late.scale > 1.45 && late.scale <= RIPPLE_MAX_SCALE);
        assert!(late.opacity < 0.05);

        assert_eq!(pulse_frame(RIPPLE_DURATION), None);
    }

    #[test]
    fn test_pulses_overlap_then_prune() {
        let mut train = PulseTrain::default();
        train.emit(Duration::ZERO);
        train.emit(RIPPLE_INTERVAL);

        // both alive between the second emission and the first fade-out
        let now = Duration::from_millis(1800);
        assert_eq!(train.frames(now).count(), 2);

        train.prune(Duration::from_millis(2100));
        assert_eq!(train.len(), 1);

        train.prune(Duration::from_millis(3500));
        assert!(train.is_empty());
    }

    #[test]
    fn test_spinner_wraps_each_period() {
        assert!(approx(spinner_rotation(Duration::ZERO), 0.0));
        assert!(approx(spinner_rotation(Duration::from_millis(750)), TAU / 2.0));
        assert!(approx(
            spinner_rotation(Duration::from_millis(1875)),
            spinner_rotation(Duration::from_millis(375))
        ));

        let (start, end) = spinner_arc(Duration::ZERO);
        assert!(approx(start, SPINNER_START_ANGLE));
        assert!(approx(end - start, 0.9 * TAU));
    }
}
