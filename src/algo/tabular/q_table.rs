use rand::Rng;

use crate::{
    assert_interval,
    decay::{self, Decay},
    env::Environment,
    exploration::{Choice, EpsilonGreedy},
    gym::{
        can_field::NUM_ACTIONS,
        perception::{StateRow, NUM_STATES},
        Action, CanField,
    },
    memory::Exp,
};

/// A dense table of action values, one row per perceived state and one column per action
#[derive(Clone, PartialEq, Debug)]
pub struct QTable {
    values: Box<[[f32; NUM_ACTIONS]; NUM_STATES]>,
}

impl QTable {
    /// A table with every value set to zero
    pub fn new() -> Self {
        Self {
            values: Box::new([[0.0; NUM_ACTIONS]; NUM_STATES]),
        }
    }

    /// `(rows, columns)`, always `(512, 5)`
    pub fn shape(&self) -> (usize, usize) {
        (self.values.len(), self.values[0].len())
    }

    pub fn get(&self, state: StateRow, action: Action) -> f32 {
        self.values[state][action.index()]
    }

    pub fn set(&mut self, state: StateRow, action: Action, value: f32) {
        self.values[state][action.index()] = value;
    }

    pub fn row(&self, state: StateRow) -> &[f32; NUM_ACTIONS] {
        &self.values[state]
    }

    /// Highest action value in a row
    pub fn max(&self, state: StateRow) -> f32 {
        self.values[state]
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// The action with the highest value, ties go to the lowest action index
    pub fn best_action(&self, state: StateRow) -> Action {
        let row = &self.values[state];
        let mut best = 0;
        for (i, &value) in row.iter().enumerate().skip(1) {
            if value > row[best] {
                best = i;
            }
        }
        Action::from_repr(best as u8).expect("Row index is a valid action")
    }

    /// Move `q[state][action]` toward `reward + gamma * max(q[next_state])`
    ///
    /// **Returns** the updated value
    pub fn update(&mut self, experience: &Exp<CanField>, alpha: f32, gamma: f32) -> f32 {
        let &Exp {
            state,
            action,
            next_state,
            reward,
        } = experience;

        let q_value = self.get(state, action);
        let target = reward + gamma * self.max(next_state);
        let updated = q_value + alpha * (target - q_value);
        self.set(state, action, updated);
        updated
    }
}

impl Default for QTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Epsilon greedy action selection over a Q-table row
///
/// Explores with probability `epsilon` by picking any of the 5 actions uniformly, otherwise
/// takes the best known action.
pub fn select_action<R: Rng + ?Sized>(
    q_table: &QTable,
    state: StateRow,
    epsilon: f32,
    rng: &mut R,
) -> Action {
    match Choice::draw(epsilon, rng) {
        Choice::Explore => Action::random(rng),
        Choice::Exploit => q_table.best_action(state),
    }
}

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone)]
pub struct QTableAgentConfig<D: Decay> {
    /// Exploration policy, evaluated per episode
    ///
    /// **Default**: epsilon starts at `0.1` and drops by `0.002` after episode 0, 50, 100, ... down to `0.0`
    pub exploration: EpsilonGreedy<D>,
    /// Learning rate
    ///
    /// **Default**: `0.2`
    pub alpha: f32,
    /// Discount factor
    ///
    /// **Default**: `0.9`
    pub gamma: f32,
}

impl Default for QTableAgentConfig<decay::Staircase> {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(
                decay::Staircase::new(0.002, 0.1, 0.0, 50.0).expect("Valid schedule"),
            ),
            alpha: 0.2,
            gamma: 0.9,
        }
    }
}

/// A Q-learning agent that learns to collect cans in a [`CanField`]
///
/// Each call to [`go`](QTableAgent::go) plays one episode of a fixed number of steps and
/// updates the table after every step.
pub struct QTableAgent<D: Decay> {
    q_table: QTable,
    exploration: EpsilonGreedy<D>,
    alpha: f32,   // learning rate
    gamma: f32,   // discount factor
    episode: u32, // current episode
}

impl<D: Decay> QTableAgent<D> {
    /// Initialize a new `QTableAgent` with an all-zero table
    ///
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(config: QTableAgentConfig<D>) -> Self {
        assert_interval!(config.alpha, 0.0, 1.0);
        assert_interval!(config.gamma, 0.0, 1.0);
        Self {
            q_table: QTable::new(),
            exploration: config.exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            episode: 0,
        }
    }

    pub fn get_q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Hand over the learned table
    pub fn into_q_table(self) -> QTable {
        self.q_table
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Epsilon in use for the current episode
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon(self.episode)
    }

    fn act<R: Rng + ?Sized>(&self, state: StateRow, rng: &mut R) -> Action {
        select_action(&self.q_table, state, self.epsilon(), rng)
    }

    fn learn(&mut self, experience: Exp<CanField>) {
        self.q_table.update(&experience, self.alpha, self.gamma);
    }

    /// Play one episode of `steps` steps on a freshly reset field
    ///
    /// **Returns** the total reward collected
    pub fn go<R: Rng + ?Sized>(&mut self, env: &mut CanField, steps: usize, rng: &mut R) -> f32 {
        let mut state = env.reset(rng);
        let mut total = 0.0;
        for _ in 0..steps {
            let action = self.act(state, rng);
            let (next_state, reward) = env.step(action, rng);
            total += reward;

            self.learn(Exp {
                state,
                action,
                next_state,
                reward,
            });
            state = next_state;
        }

        self.episode += 1;
        total
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn update_scenario() {
        let mut table = QTable::new();
        let updated = table.update(
            &Exp {
                state: 130,
                action: Action::PickUp,
                next_state: 0,
                reward: 10.0,
            },
            0.2,
            0.9,
        );
        assert_eq!(updated, 2.0);
        assert_eq!(table.get(130, Action::PickUp), 2.0);
    }

    #[test]
    fn update_bootstraps_from_next_row_max() {
        let mut table = QTable::new();
        table.set(7, Action::East, 4.0);
        table.set(7, Action::West, -8.0);
        table.set(3, Action::South, 1.0);

        let updated = table.update(
            &Exp {
                state: 3,
                action: Action::South,
                next_state: 7,
                reward: -5.0,
            },
            0.5,
            0.5,
        );
        // 1 + 0.5 * (-5 + 0.5 * 4 - 1)
        assert_eq!(updated, -1.0);
    }

    #[test]
    fn best_action_prefers_lowest_index_on_ties() {
        let mut table = QTable::new();
        assert_eq!(table.best_action(0), Action::PickUp, "All zero row");

        table.set(1, Action::South, 3.0);
        table.set(1, Action::West, 3.0);
        assert_eq!(table.best_action(1), Action::South);

        table.set(2, Action::PickUp, -1.0);
        assert_eq!(table.best_action(2), Action::North);
        assert_eq!(table.max(2), 0.0);
    }

    #[test]
    fn greedy_selection_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut table = QTable::new();
        table.set(42, Action::East, 1.5);
        for _ in 0..100 {
            assert_eq!(select_action(&table, 42, 0.0, &mut rng), Action::East);
        }
    }

    #[test]
    fn full_exploration_visits_every_action() {
        let mut rng = StdRng::seed_from_u64(0);
        let table = QTable::new();
        let mut seen = [false; NUM_ACTIONS];
        for _ in 0..200 {
            seen[select_action(&table, 0, 1.0, &mut rng).index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn shape_survives_training() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut env = CanField::new();
        let mut agent = QTableAgent::<decay::Staircase>::new(QTableAgentConfig::default());
        assert_eq!(agent.get_q_table().shape(), (512, 5));
        for _ in 0..20 {
            agent.go(&mut env, 100, &mut rng);
        }
        assert_eq!(agent.get_q_table().shape(), (512, 5));
        assert_eq!(agent.episode(), 20);
        assert_ne!(*agent.get_q_table(), QTable::new(), "Table learned something");
    }

    #[test]
    fn episode_total_matches_report() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut env = CanField::new();
        let mut agent = QTableAgent::<decay::Staircase>::new(QTableAgentConfig::default());
        let total = agent.go(&mut env, 200, &mut rng);
        let report = env.report.take();
        assert_eq!(total as f64, report["reward"]);
        assert_eq!(report["steps"], 200.0);
    }

    #[test]
    #[should_panic(expected = "config.alpha")]
    fn rejects_bad_alpha() {
        QTableAgent::new(QTableAgentConfig::<decay::Staircase> {
            alpha: 1.5,
            ..Default::default()
        });
    }
}
