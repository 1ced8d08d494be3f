use rand::Rng;

/// Exploration policy result
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Choice {
    Explore,
    Exploit,
}

impl Choice {
    /// Explore with probability `epsilon`
    ///
    /// Draws one uniform sample from `[0, 1)` and explores if it falls below `epsilon`, so an
    /// `epsilon` of `0.0` always exploits.
    pub fn draw<R: Rng + ?Sized>(epsilon: f32, rng: &mut R) -> Self {
        if epsilon > rng.gen::<f32>() {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

mod epsilon_greedy;

pub use epsilon_greedy::EpsilonGreedy;
