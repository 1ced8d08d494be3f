use crossterm::event::{Event, KeyCode};
use ratatui::{prelude::*, widgets::*};

use super::{event_keycode, Component};

/// A scatter plot of episode rewards that grows its bounds to fit the data
pub struct Plot {
    title: String,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    data: Vec<(f64, f64)>,
}

impl Plot {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.replace('\n', " - "),
            x_bounds: [0.0, 1.0],
            y_bounds: [f64::MAX, f64::MIN],
            data: Vec::new(),
        }
    }

    /// Fix the x axis to `[0, episodes]`
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.x_bounds = [0.0, episodes as f64];
        self
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.replace('\n', " - ");
    }

    pub fn push(&mut self, episode: usize, reward: f32) {
        let point = (episode as f64, reward as f64);
        self.x_bounds[1] = self.x_bounds[1].max(point.0);
        self.y_bounds[0] = self.y_bounds[0].min(point.1);
        self.y_bounds[1] = self.y_bounds[1].max(point.1);
        self.data.push(point);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
        bounds.iter().map(|x| format!("{x:.0}").bold()).collect()
    }
}

impl WidgetRef for Plot {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let y_bounds = if self.data.is_empty() {
            [0.0, 1.0]
        } else {
            self.y_bounds
        };

        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .cyan()
            .data(&self.data);

        let x_axis = Axis::default()
            .title("Episode")
            .dark_gray()
            .labels(Self::labels(self.x_bounds))
            .bounds(self.x_bounds);

        let y_axis = Axis::default()
            .title("Total reward")
            .dark_gray()
            .labels(Self::labels(y_bounds))
            .bounds(y_bounds);

        Chart::new(vec![dataset])
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(self.title.as_str())
                    .padding(Padding::uniform(1)),
            )
            .x_axis(x_axis)
            .y_axis(y_axis)
            .render(area, buf);
    }
}

/// A set of plots with one shown at a time
pub struct Plots {
    plots: Vec<Plot>,
    selected: usize,
}

impl Plots {
    pub fn new(plots: Vec<Plot>) -> Self {
        Self { plots, selected: 0 }
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut Plot> {
        self.plots.get_mut(i)
    }

    pub fn select(&mut self, i: usize) {
        if i < self.plots.len() {
            self.selected = i;
        }
    }

    fn next_plot(&mut self) {
        self.selected = (self.selected + 1) % self.plots.len();
    }

    fn prev_plot(&mut self) {
        let len = self.plots.len();
        self.selected = (self.selected + len - 1) % len;
    }
}

impl WidgetRef for Plots {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        if let Some(plot) = self.plots.get(self.selected) {
            plot.render_ref(area, buf);
        }
    }
}

impl Component for Plots {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        if self.plots.is_empty() {
            return false;
        }
        match event_keycode(event) {
            Some(KeyCode::Left) => self.prev_plot(),
            Some(KeyCode::Right) => self.next_plot(),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_tracks_bounds() {
        let mut plot = Plot::new("Training\nEpsilon decrease rate: -0.002").with_episodes(100);
        plot.push(0, -120.0);
        plot.push(200, 35.0);

        assert_eq!(plot.title, "Training - Epsilon decrease rate: -0.002");
        assert_eq!(plot.x_bounds, [0.0, 200.0]);
        assert_eq!(plot.y_bounds, [-120.0, 35.0]);
        assert_eq!(plot.len(), 2);
    }
}
