//! Running sum held as a pair of doubles (compensated summation).

use crate::math::two_sum;

/// An extended-precision accumulator.
///
/// The value is `s + t` with `s` dominant. Each [`Accumulator::add`] costs
/// at most about one ulp of the less significant word, so long sequences of
/// small contributions (polygon perimeters and areas) keep full precision.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Accumulator {
    s: f64,
    t: f64,
}

impl Accumulator {
    pub fn new(y: f64) -> Self {
        Self { s: y, t: 0.0 }
    }

    /// Reset to `y`.
    pub fn set(&mut self, y: f64) {
        self.s = y;
        self.t = 0.0;
    }

    /// Add `y`, accumulating from the least significant end.
    pub fn add(&mut self, y: f64) {
        let (y, u) = two_sum(y, self.t);
        let (s, t) = two_sum(y, self.s);
        self.s = s;
        self.t = t;
        // s, t, u are now non-adjacent and decreasing (except for zeros).
        if self.s == 0.0 {
            // t is zero too, so the result is u.
            self.s = u;
        } else {
            self.t += u;
        }
    }

    /// Current value, or the value with `y` added, leaving `self` unchanged.
    pub fn sum(&self, y: f64) -> f64 {
        if y == 0.0 {
            self.s
        } else {
            let mut b = *self;
            b.add(y);
            b.s
        }
    }

    pub fn negate(&mut self) {
        self.s = -self.s;
        self.t = -self.t;
    }
}

impl From<f64> for Accumulator {
    fn from(y: f64) -> Self {
        Self::new(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_cancelled_term() {
        let mut acc = Accumulator::default();
        acc.add(1e16);
        acc.add(1.0);
        acc.add(-1e16);
        assert_eq!(acc.sum(0.0), 1.0);

        let naive = 1e16 + 1.0 - 1e16;
        assert_ne!(naive, 1.0);
    }

    #[test]
    fn test_sum_with_addend_does_not_mutate() {
        let mut acc = Accumulator::new(1e16);
        acc.add(1.0);
        let before = acc;
        assert_eq!(acc.sum(-1e16), 1.0);
        assert_eq!(acc, before);
    }

    #[test]
    fn test_negate_and_set() {
        let mut acc = Accumulator::from(2.5);
        acc.add(0.25);
        acc.negate();
        assert_eq!(acc.sum(0.0), -2.75);
        acc.set(7.0);
        assert_eq!(acc.sum(0.0), 7.0);
    }

    #[test]
    fn test_many_small_terms() {
        let mut acc = Accumulator::default();
        let mut naive = 0.0f64;
        for _ in 0..1_000_000 {
            acc.add(0.1);
            naive += 0.1;
        }
        assert!((acc.sum(0.0) - 100_000.0).abs() < 1e-10);
        assert!((naive - 100_000.0).abs() > 1e-7);
    }
}
