//! Terminal view of a training run
//!
//! Draws the per-episode reward as it comes in, the down-sampled training curve once the
//! run finishes, and the log records captured by `tui_logger`.

use std::{
    collections::BTreeMap,
    io,
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

use crate::experiment::Monitor;

mod app;
mod components;
mod tui;

pub use app::{App, Update};

/// Install `tui_logger` as the global logger so records show up in the Logs tab
pub fn init_logger(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    tui_logger::init_logger(level)?;
    tui_logger::set_default_level(level);
    Ok(())
}

/// Spawn the viz on its own thread
///
/// **Returns** the thread handle and the sender to feed it
pub fn init(total_episodes: usize) -> (JoinHandle<io::Result<()>>, Sender<Update>) {
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || App::new(total_episodes).run(rx));
    (handle, tx)
}

/// A [`Monitor`] that forwards a training run to the viz
pub struct VizMonitor {
    handle: JoinHandle<io::Result<()>>,
    tx: Sender<Update>,
}

impl VizMonitor {
    pub fn new(total_episodes: usize) -> Self {
        let (handle, tx) = init(total_episodes);
        Self { handle, tx }
    }

    /// Wait for the user to close the viz
    pub fn join(self) -> io::Result<()> {
        drop(self.tx);
        self.handle
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "viz thread panicked"))?
    }

    fn send(&self, update: Update) {
        // The user may close the viz before training ends.
        let _ = self.tx.send(update);
    }
}

impl Monitor for VizMonitor {
    fn on_progress(&mut self, episode: usize, epsilon: f32) {
        self.send(Update::Progress { episode, epsilon });
    }

    fn on_episode(&mut self, episode: usize, report: &BTreeMap<&'static str, f64>) {
        let reward = report.get("reward").copied().unwrap_or_default() as f32;
        self.send(Update::Episode { episode, reward });
    }

    fn on_finish(&mut self, title: &str, points: &[(usize, f32)]) {
        self.send(Update::Summary {
            title: title.to_string(),
            points: points.to_vec(),
        });
    }
}
