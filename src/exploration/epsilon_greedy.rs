use rand::Rng;

use crate::decay::Decay;

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Epsilon for the given episode
    pub fn epsilon(&self, episode: u32) -> f32 {
        self.epsilon.evaluate(episode as f32)
    }

    /// The decay strategy driving epsilon
    pub fn decay(&self) -> &D {
        &self.epsilon
    }

    /// Invoke epsilon greedy policy for current episode
    pub fn choose<R: Rng + ?Sized>(&self, episode: u32, rng: &mut R) -> Choice {
        Choice::draw(self.epsilon(episode), rng)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::decay;

    #[test]
    fn extremes() {
        let mut rng = StdRng::seed_from_u64(0);
        let greedy = EpsilonGreedy::new(decay::Constant::new(0.0));
        let random = EpsilonGreedy::new(decay::Constant::new(1.0));
        for episode in 0..1000 {
            assert_eq!(greedy.choose(episode, &mut rng), Choice::Exploit);
            assert_eq!(random.choose(episode, &mut rng), Choice::Explore);
        }
    }

    #[test]
    fn explores_about_epsilon_of_the_time() {
        let mut rng = StdRng::seed_from_u64(9);
        let policy = EpsilonGreedy::new(decay::Constant::new(0.1));
        let explored = (0..20_000)
            .filter(|_| policy.choose(0, &mut rng) == Choice::Explore)
            .count();
        assert!((1600..2400).contains(&explored), "Explored {explored} times");
    }

    #[test]
    fn follows_schedule() {
        let policy = EpsilonGreedy::new(decay::Staircase::new(0.002, 0.1, 0.0, 50.0).unwrap());
        assert_eq!(policy.epsilon(0), 0.1);
        assert!((policy.epsilon(1) - 0.098).abs() < 1e-6);
        assert_eq!(policy.epsilon(5000), 0.0);
    }
}
