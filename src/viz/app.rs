use std::{
    io,
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use crossterm::event::{self, KeyCode};
use ratatui::{prelude::*, widgets::*};

use super::{
    components::{event_keycode, Component, Logs, Plot, Plots},
    tui::Tui,
};

const TABS: [&str; 2] = ["Plots", "Logs"];

const LIVE_PLOT: usize = 0;
const SUMMARY_PLOT: usize = 1;

#[derive(Default, PartialEq, Eq, Debug)]
enum State {
    #[default]
    Train,
    Done,
    Quit,
}

/// Messages from the training loop to the viz
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// A finished episode and its total reward
    Episode { episode: usize, reward: f32 },
    /// A progress marker with the epsilon used
    Progress { episode: usize, epsilon: f32 },
    /// The down-sampled reward curve at the end of training
    Summary {
        title: String,
        points: Vec<(usize, f32)>,
    },
}

/// The root TUI component which holds the main app state and runs the render loop
pub struct App {
    state: State,
    episode: usize,
    total_episodes: usize,
    epsilon: f32,
    selected_tab: usize,
    plots: Plots,
    logs: Logs,
}

impl App {
    pub fn new(total_episodes: usize) -> Self {
        let plots = vec![
            Plot::new("Episode reward").with_episodes(total_episodes),
            Plot::new("Training").with_episodes(total_episodes),
        ];
        Self {
            state: Default::default(),
            episode: 0,
            total_episodes,
            epsilon: 0.0,
            selected_tab: 0,
            plots: Plots::new(plots),
            logs: Logs::new(),
        }
    }

    fn apply(&mut self, update: Update) {
        match update {
            Update::Episode { episode, reward } => {
                self.episode = episode + 1;
                if let Some(plot) = self.plots.get_mut(LIVE_PLOT) {
                    plot.push(episode, reward);
                }
            }
            Update::Progress { episode, epsilon } => {
                self.episode = self.episode.max(episode);
                self.epsilon = epsilon;
            }
            Update::Summary { title, points } => {
                if let Some(plot) = self.plots.get_mut(SUMMARY_PLOT) {
                    plot.set_title(&title);
                    for (episode, reward) in points {
                        plot.push(episode, reward);
                    }
                }
                self.plots.select(SUMMARY_PLOT);
                self.state = State::Done;
            }
        }
    }

    /// Initialize the terminal and run the main loop until the user quits
    ///
    /// The terminal is restored when this returns, on error too
    pub fn run(&mut self, rx: Receiver<Update>) -> io::Result<()> {
        let mut terminal = Tui::enter()?;

        while self.state != State::Quit {
            if self.state == State::Train {
                loop {
                    match rx.try_recv() {
                        Ok(update) => self.apply(update),
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => {
                            self.state = State::Done;
                            break;
                        }
                    }
                }
            }

            terminal.draw(|frame| frame.render_widget(&*self, frame.size()))?;

            if !event::poll(Duration::from_millis(16))? {
                continue;
            }
            let event = event::read()?;
            match event_keycode(&event) {
                Some(KeyCode::Char('q')) => self.state = State::Quit,
                Some(KeyCode::Tab) => self.selected_tab = (self.selected_tab + 1) % TABS.len(),
                _ => {
                    match self.selected_tab {
                        0 => self.plots.handle_ui_event(&event),
                        _ => self.logs.handle_ui_event(&event),
                    };
                }
            }
        }

        Ok(())
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [menu_area, main_area, progress_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        Tabs::new(TABS)
            .block(Block::default().padding(Padding::uniform(1)))
            .white()
            .bold()
            .highlight_style(Style::default().light_green())
            .select(self.selected_tab)
            .render(menu_area, buf);

        match self.selected_tab {
            0 => self.plots.render_ref(main_area, buf),
            _ => self.logs.render_ref(main_area, buf),
        }

        let label = match self.state {
            State::Train => format!(
                "episode {}/{} (epsilon {:.3})",
                self.episode, self.total_episodes, self.epsilon
            ),
            _ => String::from("done, press q to quit"),
        };
        Gauge::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Progress"),
            )
            .gauge_style(Color::Cyan)
            .ratio((self.episode as f64 / self.total_episodes.max(1) as f64).min(1.0))
            .label(label)
            .render(progress_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_drive_state() {
        let mut app = App::new(200);
        app.apply(Update::Episode {
            episode: 0,
            reward: -40.0,
        });
        app.apply(Update::Progress {
            episode: 0,
            epsilon: 0.1,
        });
        assert_eq!(app.episode, 1);
        assert_eq!(app.epsilon, 0.1);
        assert_eq!(app.state, State::Train);

        app.apply(Update::Summary {
            title: String::from("Training"),
            points: vec![(0, -40.0), (100, 20.0)],
        });
        assert_eq!(app.state, State::Done);
        assert_eq!(app.plots.get_mut(SUMMARY_PLOT).unwrap().len(), 2);
    }
}
