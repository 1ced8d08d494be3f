use std::{error::Error, fs, path::Path};

use rand::{rngs::StdRng, SeedableRng};
use robby::experiment::{self, EvalConfig, Monitor, TrainConfig};

const NUM_EPISODES: usize = 5000;
const NUM_STEPS: usize = 200;
const SEED: u64 = 0;

/// Prints progress markers and keeps the final reward curve
#[derive(Default)]
struct Console {
    title: String,
    points: Vec<(usize, f32)>,
}

impl Monitor for Console {
    fn on_progress(&mut self, episode: usize, _epsilon: f32) {
        println!("{episode}");
    }

    fn on_finish(&mut self, title: &str, points: &[(usize, f32)]) {
        self.title = title.replace('\n', " - ");
        self.points = points.to_vec();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let path = Path::new("demos/can_robot_csv");
    let mut rng = StdRng::seed_from_u64(SEED);

    let mut console = Console::default();
    let config = TrainConfig::new(NUM_EPISODES, NUM_STEPS);
    let training = experiment::train(config, &mut rng, &mut console)?;

    fs::create_dir_all(path.join("out"))?;
    let mut wtr = csv::Writer::from_path(path.join("out/rewards.csv"))?;
    wtr.write_record(["episode", "reward"])?;
    for (episode, reward) in &console.points {
        wtr.write_record([episode.to_string(), reward.to_string()])?;
    }
    wtr.flush()?;
    println!("{} written to {}", console.title, path.join("out/rewards.csv").display());

    let stats = experiment::evaluate(
        &training.q_table,
        &EvalConfig::new(NUM_EPISODES, NUM_STEPS),
        &mut rng,
    )?;
    println!("{stats}");

    Ok(())
}
