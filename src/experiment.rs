//! Training and evaluation runs over many random can fields
//!
//! [`train`] plays episodes with a learning [`QTableAgent`] and hands back the learned
//! [`QTable`]. [`evaluate`] replays the same protocol with the table frozen and reports the
//! mean and standard deviation of the episode rewards.

use std::{collections::BTreeMap, fmt};

use log::{debug, info};
use rand::Rng;

use crate::{
    algo::{select_action, QTable, QTableAgent, QTableAgentConfig},
    decay::{self, Decay},
    env::Environment,
    error::{ensure_positive, Error, Result},
    gym::CanField,
    util::mean_std,
};

/// Configuration for [`train`]
#[derive(Debug, Clone)]
pub struct TrainConfig<D: Decay> {
    /// Number of episodes, each on a fresh field
    pub episodes: usize,
    /// Steps per episode
    pub steps: usize,
    /// Teleport the robot on every step index divisible by this
    ///
    /// **Default**: `50`
    pub teleport_every: usize,
    /// Keep every n-th episode total for the plot handed to [`Monitor::on_finish`]
    ///
    /// **Default**: `100`
    pub plot_stride: usize,
    /// Emit a progress marker on every episode index divisible by this
    ///
    /// **Default**: `50`
    pub progress_every: usize,
    pub agent: QTableAgentConfig<D>,
}

impl TrainConfig<decay::Staircase> {
    pub fn new(episodes: usize, steps: usize) -> Self {
        Self {
            episodes,
            steps,
            teleport_every: 50,
            plot_stride: 100,
            progress_every: 50,
            agent: QTableAgentConfig::default(),
        }
    }
}

impl Default for TrainConfig<decay::Staircase> {
    fn default() -> Self {
        Self::new(5000, 200)
    }
}

impl<D: Decay> TrainConfig<D> {
    fn validate(&self) -> Result<()> {
        ensure_positive("episodes", self.episodes)?;
        ensure_positive("steps", self.steps)?;
        ensure_positive("teleport_every", self.teleport_every)?;
        ensure_positive("plot_stride", self.plot_stride)?;
        ensure_positive("progress_every", self.progress_every)
    }
}

/// Configuration for [`evaluate`]
#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    pub episodes: usize,
    pub steps: usize,
    /// Exploration kept during evaluation, `0.0` acts fully greedily
    ///
    /// **Default**: `0.1`
    pub epsilon: f32,
    /// **Default**: `50`
    pub teleport_every: usize,
}

impl EvalConfig {
    pub fn new(episodes: usize, steps: usize) -> Self {
        Self {
            episodes,
            steps,
            epsilon: 0.1,
            teleport_every: 50,
        }
    }

    fn validate(&self) -> Result<()> {
        ensure_positive("episodes", self.episodes)?;
        ensure_positive("steps", self.steps)?;
        ensure_positive("teleport_every", self.teleport_every)?;
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self::new(5000, 200)
    }
}

/// Result of a training run
#[derive(Debug, Clone)]
pub struct Training {
    pub q_table: QTable,
    /// Total reward of every episode, in order
    pub episode_rewards: Vec<f32>,
}

/// Result of an evaluation run
#[derive(Debug, Clone, PartialEq)]
pub struct EvalStats {
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub episode_rewards: Vec<f32>,
}

impl fmt::Display for EvalStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Test Average = {}", self.mean)?;
        write!(f, "Test Standard Deviation = {}", self.std_dev)
    }
}

/// Receives what a training run produces while it runs
///
/// Every method does nothing by default.
pub trait Monitor {
    /// Called on every `progress_every`-th episode with the epsilon that episode used
    fn on_progress(&mut self, _episode: usize, _epsilon: f32) {}

    /// Called after every episode with its counters
    fn on_episode(&mut self, _episode: usize, _report: &BTreeMap<&'static str, f64>) {}

    /// Called once at the end with `(episode, total reward)` for every `plot_stride`-th episode
    fn on_finish(&mut self, _title: &str, _points: &[(usize, f32)]) {}
}

impl Monitor for () {}

/// A [`Monitor`] that writes through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMonitor;

impl Monitor for LogMonitor {
    fn on_finish(&mut self, title: &str, points: &[(usize, f32)]) {
        info!("{}", title.replace('\n', " - "));
        for (episode, reward) in points {
            info!("episode {episode}: {reward}");
        }
    }
}

/// Every `stride`-th element, tagged with its index
pub fn downsample(rewards: &[f32], stride: usize) -> Vec<(usize, f32)> {
    rewards
        .iter()
        .copied()
        .enumerate()
        .step_by(stride.max(1))
        .collect()
}

/// Train a Q-table from scratch
///
/// Each episode draws a fresh field and start position from `rng` and runs `config.steps`
/// steps. Epsilon follows the schedule in `config.agent.exploration`, evaluated on the
/// episode index.
pub fn train<D, R, M>(config: TrainConfig<D>, rng: &mut R, monitor: &mut M) -> Result<Training>
where
    D: Decay + fmt::Display,
    R: Rng + ?Sized,
    M: Monitor + ?Sized,
{
    config.validate()?;
    let TrainConfig {
        episodes,
        steps,
        teleport_every,
        plot_stride,
        progress_every,
        agent,
    } = config;

    let title = format!("Training\n{}", agent.exploration.decay());
    let mut env = CanField::new().with_teleport_every(Some(teleport_every))?;
    let mut agent = QTableAgent::new(agent);
    let mut episode_rewards = Vec::with_capacity(episodes);

    for i in 0..episodes {
        let epsilon = agent.epsilon();
        let total = agent.go(&mut env, steps, rng);
        let report = env.report.take();
        debug!("episode {i}: reward {total}, cans {}", report["cans"]);
        monitor.on_episode(i, &report);
        episode_rewards.push(total);

        if i % progress_every == 0 {
            info!("episode {i} (epsilon {epsilon:.3})");
            monitor.on_progress(i, epsilon);
        }
    }

    monitor.on_finish(&title, &downsample(&episode_rewards, plot_stride));

    Ok(Training {
        q_table: agent.into_q_table(),
        episode_rewards,
    })
}

/// Measure a frozen Q-table on fresh random fields
pub fn evaluate<R: Rng + ?Sized>(
    q_table: &QTable,
    config: &EvalConfig,
    rng: &mut R,
) -> Result<EvalStats> {
    config.validate()?;
    let mut env = CanField::new().with_teleport_every(Some(config.teleport_every))?;

    let episode_rewards = (0..config.episodes)
        .map(|_| rollout(q_table, config.epsilon, &mut env, config.steps, rng))
        .collect::<Vec<_>>();
    let (mean, std_dev) = mean_std(&episode_rewards);
    info!("evaluated {} episodes: mean {mean}, std {std_dev}", config.episodes);

    Ok(EvalStats {
        mean,
        std_dev,
        episode_rewards,
    })
}

fn rollout<R: Rng + ?Sized>(
    q_table: &QTable,
    epsilon: f32,
    env: &mut CanField,
    steps: usize,
    rng: &mut R,
) -> f32 {
    let mut state = env.reset(rng);
    let mut total = 0.0;
    for _ in 0..steps {
        let action = select_action(q_table, state, epsilon, rng);
        let (next_state, reward) = env.step(action, rng);
        total += reward;
        state = next_state;
    }
    total
}
