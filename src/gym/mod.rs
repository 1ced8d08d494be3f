pub mod can_field;
pub mod perception;

pub use can_field::{Action, CanField, Grid, Pos, Tile};
pub use perception::{Perception, StateRow};
