use std::{
    collections::BTreeMap,
    ops::{Deref, DerefMut},
};

use rand::Rng;

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents a continuing discrete-time MDP with one agent: episodes
/// have no terminal state and are cut off by the caller after a fixed number of steps.
/// Every random draw goes through the generator handed in by the caller.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Update the environment in response to an action taken by an agent, producing a new state and associated reward
    ///
    /// **Returns** `(next_state, reward)`
    fn step<R: Rng + ?Sized>(&mut self, action: Self::Action, rng: &mut R) -> (Self::State, f32);

    /// Reset the environment to a fresh initial state
    ///
    /// **Returns** the state
    fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Self::State;

    /// Choose an action uniformly at random
    fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Action;
}

/// An environment with a finite set of actions
pub trait DiscreteActionSpace: Environment {
    /// Get the available actions for the current state
    ///
    /// The returned vector should never be empty
    fn actions(&self) -> Vec<Self::Action>;
}

/// Named counters an environment accumulates over one episode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    keys: Vec<&'static str>,
    data: BTreeMap<&'static str, f64>,
}

impl Report {
    pub fn new(keys: Vec<&'static str>) -> Self {
        let data = keys.iter().map(|&k| (k, 0.0)).collect();
        Self { keys, data }
    }

    /// The counter names in the order they were registered
    pub fn keys(&self) -> &[&'static str] {
        &self.keys
    }

    /// Take the current counters and reset them all to zero
    pub fn take(&mut self) -> BTreeMap<&'static str, f64> {
        let fresh = self.keys.iter().map(|&k| (k, 0.0)).collect();
        std::mem::replace(&mut self.data, fresh)
    }

    /// Reset every counter to zero
    pub fn reset(&mut self) {
        self.data.values_mut().for_each(|x| *x = 0.0);
    }
}

impl Deref for Report {
    type Target = BTreeMap<&'static str, f64>;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl DerefMut for Report {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_and_takes() {
        let mut report = Report::new(vec!["reward", "steps"]);
        report.entry("steps").and_modify(|x| *x += 1.0);
        report.entry("steps").and_modify(|x| *x += 1.0);
        report.entry("reward").and_modify(|x| *x -= 5.0);

        assert_eq!(report["steps"], 2.0, "Steps counted");
        assert_eq!(report.keys(), ["reward", "steps"], "Keys kept in order");

        let taken = report.take();
        assert_eq!(taken["reward"], -5.0, "Taken report holds totals");
        assert_eq!(report["reward"], 0.0, "Report zeroed after take");
        assert_eq!(report["steps"], 0.0, "Report zeroed after take");
    }
}
