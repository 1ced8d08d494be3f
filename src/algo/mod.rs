pub mod tabular;

pub use tabular::q_table::{select_action, QTable, QTableAgent, QTableAgentConfig};
