use std::error::Error;

use rand::thread_rng;
use robby::{
    experiment::{self, EvalConfig, TrainConfig},
    viz::{self, VizMonitor},
};

const NUM_EPISODES: usize = 5000;
const NUM_STEPS: usize = 200;

fn main() -> Result<(), Box<dyn Error>> {
    viz::init_logger(log::LevelFilter::Info)?;
    let mut rng = thread_rng();

    let mut monitor = VizMonitor::new(NUM_EPISODES);
    let config = TrainConfig::new(NUM_EPISODES, NUM_STEPS);
    let training = experiment::train(config, &mut rng, &mut monitor)?;
    monitor.join()?;

    let stats = experiment::evaluate(
        &training.q_table,
        &EvalConfig::new(NUM_EPISODES, NUM_STEPS),
        &mut rng,
    )?;
    println!("{stats}");

    Ok(())
}
