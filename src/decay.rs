use std::fmt;

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;
}

// TODO: better error types
fn validate(rate: f32, vi: f32, vf: f32) -> Result<(), String> {
    ((rate >= 0.0 && vi > vf) || (rate < 0.0 && vi < vf))
        .then_some(())
        .ok_or_else(|| String::from("`vi - vf` must have same sign as `rate`"))
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f32) -> f32 {
        self.value
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Epsilon: {}", self.value)
    }
}

/// v(t) = max(v<sub>i</sub> - r * ceil(t/s), v<sub>f</sub>)
///
/// The value drops by `rate` once at the end of every `step`-th period, starting with
/// the very first one, so `t = 0` sees `vi` and `t` in `1..=s` sees `vi - rate`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Staircase {
    rate: f32,
    vi: f32,
    vf: f32,
    step: f32,
}

impl Staircase {
    pub fn new(rate: f32, vi: f32, vf: f32, step: f32) -> Result<Self, String> {
        validate(rate, vi, vf)?;
        if step <= 0.0 {
            return Err(String::from("`step` must be positive"));
        }
        Ok(Self { rate, vi, vf, step })
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }
}

impl Decay for Staircase {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf, step } = self;
        let drops = (t / step).ceil();
        if rate >= 0.0 {
            (vi - rate * drops).max(vf)
        } else {
            (vi - rate * drops).min(vf)
        }
    }
}

impl fmt::Display for Staircase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Epsilon decrease rate: {}", -self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_functional() {
        assert!(validate(1.0, 1.0, 0.0).is_ok());
        assert!(validate(1.0, -1.0, 0.0).is_err());
        assert!(validate(-1.0, 1.0, 0.0).is_err());
        assert!(validate(-1.0, -1.0, 0.0).is_ok());
    }

    #[test]
    fn constant_decay() {
        let x = Constant::new(1.0);
        assert_eq!(x.evaluate(0.0), 1.0);
        assert_eq!(x.evaluate(1.0), 1.0);
    }

    #[test]
    fn staircase_decay() {
        let x = Staircase::new(0.5, 2.0, 0.0, 10.0).unwrap();
        assert_eq!(x.evaluate(0.0), 2.0);
        assert_eq!(x.evaluate(1.0), 1.5);
        assert_eq!(x.evaluate(10.0), 1.5);
        assert_eq!(x.evaluate(11.0), 1.0);
        assert_eq!(x.evaluate(1000.0), 0.0);
    }

    #[test]
    fn staircase_matches_iterative_decrement() {
        let x = Staircase::new(0.002, 0.1, 0.0, 50.0).unwrap();
        let mut epsilon = 0.1f32;
        for i in 0..6000u32 {
            assert!(
                (x.evaluate(i as f32) - epsilon).abs() < 1e-5,
                "Episode {i} epsilon matches"
            );
            if i % 50 == 0 {
                epsilon = (epsilon - 0.002).max(0.0);
            }
        }
    }

    #[test]
    fn staircase_never_negative() {
        let x = Staircase::new(0.002, 0.1, 0.0, 50.0).unwrap();
        for t in [2500.0, 2501.0, 1e6, f32::MAX] {
            assert!(x.evaluate(t) >= 0.0, "Floor holds at t = {t}");
        }
    }

    #[test]
    fn staircase_rejects_bad_step() {
        assert!(Staircase::new(0.002, 0.1, 0.0, 0.0).is_err());
    }

    #[test]
    fn staircase_label() {
        let x = Staircase::new(0.002, 0.1, 0.0, 50.0).unwrap();
        assert_eq!(x.to_string(), "Epsilon decrease rate: -0.002");
    }
}
