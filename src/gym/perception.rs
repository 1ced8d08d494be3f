//! Compact encoding of what the robot sees
//!
//! The robot perceives its own tile and the four tiles around it. Each neighbour is
//! described by a `(bound_flag, item_flag)` pair, so a perception is a 9-bit vector
//! ordered `[current, N-bound, N-item, S-bound, S-item, E-bound, E-item, W-bound, W-item]`
//! and bit `i` carries weight 2<sup>i</sup> in the state row.

use super::can_field::{tile_content_binary, Action, Grid, Pos};

/// Length of an encoded perception
pub const STATE_BITS: usize = 9;

/// Number of distinct state rows
pub const NUM_STATES: usize = 1 << STATE_BITS;

/// Index of a perception in a Q-table
pub type StateRow = usize;

const DIRECTIONS: [Action; 4] = [Action::North, Action::South, Action::East, Action::West];

/// Encode the robot's view at `pos` as a 9-bit vector
pub fn encode_state(grid: &Grid, pos: Pos) -> [u8; STATE_BITS] {
    let mut state = [0; STATE_BITS];
    state[0] = grid.get(pos);
    for (i, dir) in DIRECTIONS.into_iter().enumerate() {
        let next = pos.neighbor(dir);
        let (bound, item) = tile_content_binary(grid, next.row, next.col);
        state[1 + 2 * i] = bound;
        state[2 + 2 * i] = item;
    }
    state
}

/// Pack a 9-bit vector into its state row
pub fn state_row(state: &[u8; STATE_BITS]) -> StateRow {
    state
        .iter()
        .enumerate()
        .filter(|&(_, &bit)| bit == 1)
        .map(|(i, _)| 1usize << i)
        .sum()
}

/// Unpack a state row into its 9-bit vector
///
/// **Panics** if `row` is not below [`NUM_STATES`]
pub fn decode_row(row: StateRow) -> [u8; STATE_BITS] {
    assert!(row < NUM_STATES, "State row {row} out of range");
    std::array::from_fn(|i| ((row >> i) & 1) as u8)
}

/// A decoded perception
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Perception {
    pub current: bool,
    /// `(bound_flag, item_flag)` for north, south, east and west
    pub neighbors: [(bool, bool); 4],
}

impl Perception {
    pub fn observe(grid: &Grid, pos: Pos) -> Self {
        Self::from_bits(&encode_state(grid, pos))
    }

    pub fn from_row(row: StateRow) -> Self {
        Self::from_bits(&decode_row(row))
    }

    fn from_bits(bits: &[u8; STATE_BITS]) -> Self {
        Self {
            current: bits[0] == 1,
            neighbors: std::array::from_fn(|i| (bits[1 + 2 * i] == 1, bits[2 + 2 * i] == 1)),
        }
    }

    pub fn bits(&self) -> [u8; STATE_BITS] {
        let mut bits = [0; STATE_BITS];
        bits[0] = self.current as u8;
        for (i, &(bound, item)) in self.neighbors.iter().enumerate() {
            bits[1 + 2 * i] = bound as u8;
            bits[2 + 2 * i] = item as u8;
        }
        bits
    }

    pub fn row(&self) -> StateRow {
        state_row(&self.bits())
    }

    /// No direction reports both a wall and a can
    pub fn is_consistent(&self) -> bool {
        self.neighbors.iter().all(|&(bound, item)| !(bound && item))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::gym::can_field::SIZE;

    #[test]
    fn empty_corner_scenario() {
        let state = encode_state(&Grid::empty(), Pos::new(0, 0).unwrap());
        assert_eq!(state, [0, 1, 0, 0, 0, 0, 0, 1, 0]);
        assert_eq!(state_row(&state), 130);
    }

    #[test]
    fn rows_round_trip() {
        for row in 0..NUM_STATES {
            assert_eq!(state_row(&decode_row(row)), row, "Row {row} round trips");
            assert_eq!(Perception::from_row(row).row(), row);
        }
    }

    #[test]
    fn distinct_vectors_give_distinct_rows() {
        let rows = (0..NUM_STATES)
            .map(|row| state_row(&decode_row(row)))
            .collect::<HashSet<_>>();
        assert_eq!(rows.len(), NUM_STATES);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn decode_rejects_large_rows() {
        decode_row(NUM_STATES);
    }

    #[test]
    fn observed_perceptions_are_consistent() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let grid = Grid::random(&mut rng);
            for row in 0..SIZE as i32 {
                for col in 0..SIZE as i32 {
                    let perception = Perception::observe(&grid, Pos::new(row, col).unwrap());
                    assert!(perception.is_consistent());
                    seen.insert(perception.row());
                }
            }
        }

        // Walls on opposite sides cannot occur on a 10x10 field, and no direction is
        // ever both a wall and a can. Everything else shows up.
        let reachable = (0..NUM_STATES)
            .map(Perception::from_row)
            .filter(|p| {
                let [n, s, e, w] = p.neighbors;
                p.is_consistent() && !(n.0 && s.0) && !(e.0 && w.0)
            })
            .map(|p| p.row())
            .collect::<HashSet<_>>();
        assert_eq!(seen, reachable);
    }
}
